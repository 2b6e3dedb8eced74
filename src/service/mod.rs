pub mod processor;

pub use processor::NotaService;
