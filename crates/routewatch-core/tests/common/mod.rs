#![allow(dead_code)]

pub mod routing_server;
