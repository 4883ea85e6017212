pub mod coingecko;
pub mod yahoo_finance;
