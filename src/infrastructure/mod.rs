pub mod jsonl;
pub mod observability;
pub mod persistence;
