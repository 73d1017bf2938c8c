// Misc functions for interface
// Logging helpers in front of the verbosity switch.
#![allow(dead_code)]

use std::io::{self, Write};

use sysdefs::constants::err_const::verbosity;

// Print text to stdout
pub fn log_to_stdout(s: &str) {
    print!("{}", s);
}

// Print text to stderr
pub fn log_to_stderr(s: &str) {
    eprintln!("{}", s);
}

pub fn log_verbose(s: &str) {
    if verbosity() > 0 {
        log_to_stderr(s);
    }
}

// Flush contents of stdout
pub fn flush_stdout() {
    let _ = io::stdout().flush();
}
