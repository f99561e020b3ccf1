pub mod reportcard;
