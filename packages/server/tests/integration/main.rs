mod common;

mod images;
mod storage;
