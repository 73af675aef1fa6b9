mod atomicity;
mod drift;
mod scenarios;
