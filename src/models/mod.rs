pub mod nota;

pub use nota::{ItemNota, NotaExtraida, NotaProcessada, SENTINELA_DESCONHECIDO};
