#![allow(dead_code)]

pub mod synthetic_capture;
pub mod synthetic_points;
