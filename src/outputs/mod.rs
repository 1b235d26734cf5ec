//! Output of the assembled [`ResultTable`](crate::models::ResultTable).
//!
//! - [`preview`]: renders the first rows for the console
//! - [`json`]: optional JSON snapshot on disk
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     └── evening.json
//! ```

pub mod json;
pub mod preview;
