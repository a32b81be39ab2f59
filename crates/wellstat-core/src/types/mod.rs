pub mod boundary;
pub mod counter;
pub mod event;
pub mod window;

pub use boundary::{normalize_range, BoundaryTag, TimeBoundary};
pub use counter::WellboreCounter;
pub use event::{decode_wellbore_id, encode_wellbore_id, EventRecord, WELLBORE_ID_LEN};
pub use window::{CloseOutcome, TransactionWindow, WindowState};
