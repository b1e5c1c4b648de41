use uuid::Uuid;

use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::value::JsValue;

/// One frame of the call stack. The receiver is fixed when the frame is pushed.
pub struct ExecutionContext {
    pub id: Uuid,
    pub function_name: String,
    pub this_value: JsValue,
    pub lex_env: JsLexEnvironmentType,
    pub var_env: JsLexEnvironmentType,
    pub strict: bool,
}
impl ExecutionContext {
    pub fn new(
        function_name: String,
        this_value: JsValue,
        env: JsLexEnvironmentType,
        strict: bool,
    ) -> Self {
        ExecutionContext {
            id: Uuid::new_v4(),
            function_name,
            this_value,
            lex_env: env.clone(),
            var_env: env,
            strict,
        }
    }
}

pub struct ExecutionContextStack {
    stack: Vec<ExecutionContext>,
}
impl ExecutionContextStack {
    pub fn new() -> Self {
        ExecutionContextStack { stack: Vec::new() }
    }

    pub fn get_running_execution_ctx(&self) -> Option<&ExecutionContext> {
        self.stack.last()
    }

    pub fn get_running_execution_ctx_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.stack.last_mut()
    }

    pub fn pop_running_execution_ctx(&mut self) -> Option<ExecutionContext> {
        self.stack.pop()
    }

    pub fn push_execution_ctx(&mut self, ctx: ExecutionContext) {
        self.stack.push(ctx)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
impl Default for ExecutionContextStack {
    fn default() -> Self {
        Self::new()
    }
}
