use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::parser::RowFilter;
use crate::Cli;

const DEFAULT_CONFIG: &str = "inventory.toml";
const DEFAULT_OUTPUT: &str = "data/products_clean.json";
const ENV_PREFIX: &str = "INVENTORY";

/// Keys accepted from the config file and `INVENTORY_*` environment variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    errors_output: Option<PathBuf>,
    sheet: Option<String>,
    skip_rows: Option<usize>,
    date_added: Option<String>,
    denylist: Option<Vec<String>>,
    skip_prefixes: Option<Vec<String>>,
    sample_errors: Option<usize>,
    sample_products: Option<usize>,
}

/// Resolved run settings: CLI flags over environment over config file over defaults.
#[derive(Debug)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub errors_output: Option<PathBuf>,
    pub sheet: Option<String>,
    pub skip_rows: usize,
    pub date_added: NaiveDate,
    pub filter: RowFilter,
    pub sample_errors: usize,
    pub sample_products: usize,
    pub dry_run: bool,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self> {
        let (path, required) = match &cli.config {
            Some(p) => (p.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };
        let file: FileSettings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("denylist")
                    .with_list_parse_key("skip_prefixes"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::resolve(cli, file)
    }

    fn resolve(cli: &Cli, file: FileSettings) -> Result<Self> {
        let input = cli
            .input
            .clone()
            .or(file.input)
            .context("No input spreadsheet given (use --input or INVENTORY_INPUT)")?;

        let date_added = match cli.date_added.as_deref().or(file.date_added.as_deref()) {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date_added {:?}, expected YYYY-MM-DD", s))?,
            None => chrono::Local::now().date_naive(),
        };

        let defaults = RowFilter::default();
        Ok(Settings {
            input,
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            errors_output: cli.errors_output.clone().or(file.errors_output),
            sheet: cli.sheet.clone().or(file.sheet),
            skip_rows: cli.skip_rows.or(file.skip_rows).unwrap_or(2),
            date_added,
            filter: RowFilter {
                denylist: file.denylist.unwrap_or(defaults.denylist),
                skip_prefixes: file.skip_prefixes.unwrap_or(defaults.skip_prefixes),
            },
            sample_errors: file.sample_errors.unwrap_or(5),
            sample_products: file.sample_products.unwrap_or(3),
            dry_run: cli.dry_run,
        })
    }

    pub fn date_added_str(&self) -> String {
        self.date_added.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use clap::Parser;

    // Tests that go through `Settings::load` read the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("inventory_import").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let s = Settings::resolve(&cli(&["--input", "inv.xlsx"]), FileSettings::default()).unwrap();
        assert_eq!(s.input, PathBuf::from("inv.xlsx"));
        assert_eq!(s.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(s.skip_rows, 2);
        assert_eq!(s.sample_errors, 5);
        assert_eq!(s.sample_products, 3);
        assert!(s.filter.denylist.contains(&"DIA DEL PADRE".to_string()));
        assert_eq!(s.filter.skip_prefixes, vec!["NUEVO".to_string()]);
        assert!(!s.dry_run);
    }

    #[test]
    fn cli_overrides_file() {
        let file = FileSettings {
            input: Some("from_file.xlsx".into()),
            output: Some("file_out.json".into()),
            skip_rows: Some(4),
            date_added: Some("2025-12-01".into()),
            denylist: Some(vec!["TOTAL".into()]),
            ..Default::default()
        };
        let s = Settings::resolve(
            &cli(&["--output", "cli_out.json", "--date-added", "2026-01-29", "--dry-run"]),
            file,
        )
        .unwrap();
        assert_eq!(s.input, PathBuf::from("from_file.xlsx"));
        assert_eq!(s.output, PathBuf::from("cli_out.json"));
        assert_eq!(s.skip_rows, 4);
        assert_eq!(s.date_added_str(), "2026-01-29");
        assert_eq!(s.filter.denylist, vec!["TOTAL".to_string()]);
        assert!(s.dry_run);
    }

    #[test]
    fn missing_input() {
        assert!(Settings::resolve(&cli(&[]), FileSettings::default()).is_err());
    }

    #[test]
    fn bad_date() {
        let err = Settings::resolve(&cli(&["-i", "a.csv", "--date-added", "29/01/2026"]), FileSettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn toml_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(
            &path,
            "input = \"inv.csv\"\nskip_rows = 1\ndate_added = \"2026-01-29\"\ndenylist = [\"Nombre\", \"TOTAL\"]\n",
        )
        .unwrap();
        let s = Settings::load(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(s.input, PathBuf::from("inv.csv"));
        assert_eq!(s.skip_rows, 1);
        assert_eq!(s.filter.denylist, vec!["Nombre".to_string(), "TOTAL".to_string()]);
    }

    #[test]
    fn explicit_config_must_exist() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        assert!(Settings::load(&cli(&["--config", "tests/fixtures/nope.toml", "-i", "a.csv"])).is_err());
    }

    #[test]
    fn environment_layer() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let vars = [
            ("INVENTORY_INPUT", "env.csv"),
            ("INVENTORY_SKIP_ROWS", "4"),
            ("INVENTORY_DENYLIST", "Nombre,TOTAL,DIA DEL PADRE"),
            ("INVENTORY_SKIP_PREFIXES", "NUEVO,OFERTA"),
            ("INVENTORY_DATE_ADDED", "2026-01-29"),
        ];
        for (k, v) in vars {
            std::env::set_var(k, v);
        }

        let from_env = Settings::load(&cli(&[]));
        let cli_wins = Settings::load(&cli(&["--skip-rows", "1"]));

        for (k, _) in vars {
            std::env::remove_var(k);
        }

        let s = from_env.unwrap();
        assert_eq!(s.input, PathBuf::from("env.csv"));
        assert_eq!(s.skip_rows, 4);
        assert_eq!(
            s.filter.denylist,
            vec!["Nombre".to_string(), "TOTAL".to_string(), "DIA DEL PADRE".to_string()]
        );
        assert_eq!(s.filter.skip_prefixes, vec!["NUEVO".to_string(), "OFERTA".to_string()]);
        assert_eq!(s.date_added_str(), "2026-01-29");

        assert_eq!(cli_wins.unwrap().skip_rows, 1);
    }
}
