mod export;
mod info;
