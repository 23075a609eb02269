//! STL Converter Binary

use stlconv::{ConverterCli, ConverterError};
use std::process;

fn main() {
    let mut cli = ConverterCli::new();

    match cli.run() {
        Ok(()) => {}
        Err(ConverterError::Io(e)) => {
            eprintln!("IO Error: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
