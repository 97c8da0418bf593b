pub(crate) mod backup;
pub(crate) mod import;
pub(crate) mod meta;
pub(crate) mod retrieve;
pub(crate) mod search;
pub(crate) mod shared;
