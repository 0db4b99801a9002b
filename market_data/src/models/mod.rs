pub mod metadata;
pub mod ohlcv;
pub mod request_params;
pub mod ticker;
pub mod timeframe;
