mod coordinator;
mod loopback;
mod results;
