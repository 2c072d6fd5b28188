//! Build SimulationCraft command lines and run `simc` as a subprocess.
//!
//! ```no_run
//! use simcrunner::args::{ArgumentOwner, Arguments, FileExport, Profile};
//! use simcrunner::runner::Runner;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut runner = Runner::from_env(None)?;
//! runner.set(
//!     Arguments::new()
//!         .add("iterations=1000")
//!         .add(Profile::new("myprofile", true))
//!         .add(FileExport::json("out/result")?),
//! );
//! let record = runner.run();
//! println!("{:?}", record.return_code);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod logging;
pub mod runner;
