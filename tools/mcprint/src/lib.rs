//! Render JSON Lines MC instruction listings as TriCore assembly.

pub mod listing;

pub use listing::{
    parse_record, render_listing, ExprRecord, InsnRecord, ListingError,
    OperandRecord,
};
