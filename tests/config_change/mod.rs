mod file_source;
mod polling;
