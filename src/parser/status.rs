use crate::record::Status;

pub fn classify(quantity: u64) -> Status {
    match quantity {
        0 => Status::Sold,
        1..=2 => Status::LowStock,
        _ => Status::Available,
    }
}
