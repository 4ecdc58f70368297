/// UI module exports

pub mod popup;
pub mod options;
