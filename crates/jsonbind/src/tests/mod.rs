mod arbitrary;
mod scenarios;
mod serialize;
