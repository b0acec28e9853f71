mod records;
mod vectors;

pub use records::RecordRepository;
pub use vectors::VectorRepository;
