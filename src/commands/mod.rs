//! Commands run by the `tap2junit` binary

pub mod convert;

pub use convert::ConvertCommand;
