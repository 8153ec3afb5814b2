//! Agent patterns. Only ReAct (think → act → observe) is implemented here.

pub mod react;
