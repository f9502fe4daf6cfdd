#![macro_use]
#![allow(unused_macros)]

/// prints an error to stderr and exits with code 1
macro_rules! err {
    ($($arg:tt)*) => {{
        eprintln!("[E] {}", format!($($arg)*).bold().red());
        std::process::exit(1)
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {
        println!("[W] {}", format!($($arg)*).italic().yellow())
    };
}

macro_rules! info {
    ($($arg:tt)*) => {
        println!("[I] {}", format!($($arg)*).italic().white())
    };
}

/// a phrase was found
macro_rules! hit {
    ($($arg:tt)*) => {
        println!("[+] {}", format!($($arg)*).bold().green())
    };
}
