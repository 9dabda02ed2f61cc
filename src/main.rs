//! # MSIPL
//!
//! Runs one MSIPL script on a single simulated part until it completes.
//!

fn main() {
    msipl::term::main();
}
