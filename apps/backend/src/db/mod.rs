pub mod retry;
pub mod txn;
