pub mod env_record;
pub mod error;
pub mod execution_context;
pub mod function_object;
pub mod lex_env;
pub mod object;
pub mod operations;
pub mod value;
