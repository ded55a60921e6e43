//! Rendering only: every number shown here comes from `school_census::data`.

pub mod pages;
pub mod panels;
pub mod plot;
pub mod tables;
