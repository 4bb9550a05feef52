// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod calculator;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod explanation;
pub mod http_server;
pub mod symbolic;
