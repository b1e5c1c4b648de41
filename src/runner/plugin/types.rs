//! Core types shared by the evaluator and the built-ins.

use std::collections::HashMap;

use crate::runner::binding::BindingEnvironment;
use crate::runner::config::EngineConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::execution_context::{ExecutionContext, ExecutionContextStack};
use crate::runner::ds::function_object::JsFunctionObject;
use crate::runner::ds::lex_env::JsLexEnvironmentType;
use crate::runner::ds::object::{new_js_object, object_create, JsObjectType, ObjectType};
use crate::runner::ds::operations::lex_env::{
    get_binding_value, get_identifier_reference, new_declarative_environment,
    new_global_environment, set_mutable_binding,
};
use crate::runner::ds::operations::object::put;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::registry::BuiltInRegistry;

lazy_static! {
    /// Names under which scripts can reach the global object.
    pub static ref GLOBAL_OBJECT_ALIASES: Vec<&'static str> = vec!["globalThis", "window"];
}

pub const SCRIPT_FRAME_NAME: &str = "<script>";

/// Function signature for built-in methods.
/// Native functions receive the evaluation context, `this` value, and arguments.
pub type NativeFn =
    fn(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType>;

/// Where the methods of a built-in object end up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltInTarget {
    /// A global object named after the built-in, e.g. `console`.
    Global,
    /// Methods shared by every function value, e.g. `call`.
    FunctionPrototype,
}

/// Built-in object definition.
pub struct BuiltInObject {
    pub name: String,
    pub target: BuiltInTarget,
    pub methods: HashMap<String, NativeFn>,
}

impl BuiltInObject {
    pub fn new(name: impl Into<String>) -> Self {
        BuiltInObject {
            name: name.into(),
            target: BuiltInTarget::Global,
            methods: HashMap::new(),
        }
    }

    pub fn on_function_prototype(mut self) -> Self {
        self.target = BuiltInTarget::FunctionPrototype;
        self
    }

    pub fn add_method(mut self, name: impl Into<String>, func: NativeFn) -> Self {
        self.methods.insert(name.into(), func);
        self
    }
}

/// Interpreter state: configuration, realm objects, the frame stack and captured console
/// output. Passed to every evaluation function and native.
pub struct EvalContext {
    pub config: EngineConfig,
    pub global_object: JsObjectType,
    pub function_prototype: JsObjectType,
    pub global_env: JsLexEnvironmentType,
    pub stack: ExecutionContextStack,
    console_output: Vec<String>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let global_object = object_create(None);
        let function_prototype = object_create(None);
        let global_env = new_global_environment(global_object.clone());
        put(&global_object, "undefined", JsValue::Undefined);
        for alias in GLOBAL_OBJECT_ALIASES.iter() {
            put(&global_object, alias, JsValue::Object(global_object.clone()));
        }
        let mut script_frame = ExecutionContext::new(
            SCRIPT_FRAME_NAME.to_string(),
            JsValue::Object(global_object.clone()),
            global_env.clone(),
            config.strict_mode,
        );
        // Top-level `let`/`const` live in a declarative scope above the global object.
        script_frame.lex_env = new_declarative_environment(Some(global_env.clone()));
        let mut stack = ExecutionContextStack::new();
        stack.push_execution_ctx(script_frame);
        EvalContext {
            config,
            global_object,
            function_prototype,
            global_env,
            stack,
            console_output: Vec::new(),
        }
    }

    /// Materialises every registered built-in as function objects.
    pub fn install_core_builtins(&mut self, registry: BuiltInRegistry) {
        for builtin in registry.into_objects() {
            let holder = match builtin.target {
                BuiltInTarget::Global => {
                    let o = object_create(None);
                    put(&self.global_object, &builtin.name, JsValue::Object(o.clone()));
                    o
                }
                BuiltInTarget::FunctionPrototype => self.function_prototype.clone(),
            };
            let mut methods: Vec<(String, NativeFn)> = builtin.methods.into_iter().collect();
            methods.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, native) in methods {
                let function = new_js_object(ObjectType::Function(
                    JsFunctionObject::new_native_function(
                        name.clone(),
                        native,
                        Some(self.function_prototype.clone()),
                    ),
                ));
                put(&holder, &name, JsValue::Object(function));
            }
        }
    }

    pub fn global_this(&self) -> JsValue {
        JsValue::Object(self.global_object.clone())
    }

    pub fn binding_environment(&self) -> BindingEnvironment {
        BindingEnvironment {
            strict_mode: self.config.strict_mode,
            global_this: self.global_this(),
        }
    }

    /// Receiver of the running frame.
    pub fn current_this(&self) -> JsValue {
        match self.stack.get_running_execution_ctx() {
            Some(frame) => frame.this_value.clone(),
            None => self.global_this(),
        }
    }

    pub fn lexical_environment(&self) -> JsLexEnvironmentType {
        match self.stack.get_running_execution_ctx() {
            Some(frame) => frame.lex_env.clone(),
            None => self.global_env.clone(),
        }
    }

    pub fn variable_environment(&self) -> JsLexEnvironmentType {
        match self.stack.get_running_execution_ctx() {
            Some(frame) => frame.var_env.clone(),
            None => self.global_env.clone(),
        }
    }

    /// Whether the running code is strict, by configuration or by directive.
    pub fn is_strict(&self) -> bool {
        self.config.strict_mode
            || self
                .stack
                .get_running_execution_ctx()
                .map(|frame| frame.strict)
                .unwrap_or(false)
    }

    pub fn set_running_strict(&mut self, strict: bool) {
        let strict = strict || self.config.strict_mode;
        if let Some(frame) = self.stack.get_running_execution_ctx_mut() {
            frame.strict = strict;
        }
    }

    pub fn has_binding(&self, name: &str) -> bool {
        get_identifier_reference(&self.lexical_environment(), name).is_some()
    }

    pub fn get_binding(&self, name: &str) -> Result<JsValue, JErrorType> {
        match get_identifier_reference(&self.lexical_environment(), name) {
            Some(env) => get_binding_value(&env, name),
            None => Err(JErrorType::ReferenceError(format!("{} is not defined", name))),
        }
    }

    /// Assigns to an existing binding. Undeclared names become global properties in sloppy
    /// code and fail in strict code.
    pub fn set_binding(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        match get_identifier_reference(&self.lexical_environment(), name) {
            Some(env) => set_mutable_binding(&env, name, value),
            None => {
                if self.is_strict() {
                    Err(JErrorType::ReferenceError(format!("{} is not defined", name)))
                } else {
                    put(&self.global_object, name, value);
                    Ok(())
                }
            }
        }
    }

    /// Hoisted `var`: created once, initialised to `undefined`.
    pub fn declare_var(&mut self, name: &str) {
        let env = self.variable_environment();
        let mut env = (*env).borrow_mut();
        let record = env.inner.as_env_record_mut();
        if !record.has_binding(name) {
            record.create_mutable_binding(name.to_string());
            record.initialize_binding(name.to_string(), JsValue::Undefined);
        }
    }

    /// Function declarations overwrite any earlier binding of the same name.
    pub fn declare_function(&mut self, name: &str, value: JsValue) {
        let env = self.variable_environment();
        let mut env = (*env).borrow_mut();
        let record = env.inner.as_env_record_mut();
        record.create_mutable_binding(name.to_string());
        record.initialize_binding(name.to_string(), value);
    }

    /// Block-level function declaration. A later declaration of the same name replaces it.
    pub fn declare_block_function(&mut self, name: &str, value: JsValue) {
        let env = self.lexical_environment();
        let mut env = (*env).borrow_mut();
        let record = env.inner.as_env_record_mut();
        record.create_mutable_binding(name.to_string());
        record.initialize_binding(name.to_string(), value);
    }

    pub fn declare_lexical(
        &mut self,
        name: &str,
        value: JsValue,
        mutable: bool,
    ) -> Result<(), JErrorType> {
        let env = self.lexical_environment();
        let mut env = (*env).borrow_mut();
        let record = env.inner.as_env_record_mut();
        if record.has_binding(name) {
            return Err(JErrorType::SyntaxError(format!(
                "Identifier '{}' has already been declared",
                name
            )));
        }
        if mutable {
            record.create_mutable_binding(name.to_string());
        } else {
            record.create_immutable_binding(name.to_string());
        }
        record.initialize_binding(name.to_string(), value);
        Ok(())
    }

    pub fn push_execution_ctx(&mut self, frame: ExecutionContext) -> Result<(), JErrorType> {
        if self.stack.len() > self.config.max_call_depth {
            return Err(JErrorType::RangeError(
                "Maximum call stack size exceeded".to_string(),
            ));
        }
        tracing::trace!(
            frame_id = %frame.id,
            function = %frame.function_name,
            depth = self.stack.len(),
            "push frame"
        );
        self.stack.push_execution_ctx(frame);
        Ok(())
    }

    pub fn pop_execution_ctx(&mut self) -> Option<ExecutionContext> {
        let frame = self.stack.pop_running_execution_ctx();
        if let Some(frame) = &frame {
            tracing::trace!(frame_id = %frame.id, function = %frame.function_name, "pop frame");
        }
        frame
    }

    /// Enters a block scope. Returns the environment to restore with `pop_block_scope`.
    pub fn push_block_scope(&mut self) -> JsLexEnvironmentType {
        let previous = self.lexical_environment();
        let block_env = new_declarative_environment(Some(previous.clone()));
        if let Some(frame) = self.stack.get_running_execution_ctx_mut() {
            frame.lex_env = block_env;
        }
        previous
    }

    pub fn pop_block_scope(&mut self, previous: JsLexEnvironmentType) {
        if let Some(frame) = self.stack.get_running_execution_ctx_mut() {
            frame.lex_env = previous;
        }
    }

    pub fn write_console(&mut self, line: String, to_stderr: bool) {
        if self.config.echo_console {
            if to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
        self.console_output.push(line);
    }

    pub fn console_output(&self) -> &[String] {
        &self.console_output
    }

    pub fn take_console_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console_output)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::runner::ds::operations::object::get;

    #[test]
    fn global_object_is_reachable_through_aliases() {
        let ctx = EvalContext::new();
        for alias in GLOBAL_OBJECT_ALIASES.iter() {
            assert_eq!(ctx.get_binding(alias).unwrap(), ctx.global_this());
        }
        assert_eq!(ctx.current_this(), ctx.global_this());
    }

    #[test]
    fn sloppy_assignment_creates_global_property() {
        let mut ctx = EvalContext::new();
        ctx.set_binding("word", JsValue::from("Hello")).unwrap();
        assert_eq!(get(&ctx.global_object, "word"), JsValue::from("Hello"));
    }

    #[test]
    fn strict_assignment_to_undeclared_fails() {
        let mut ctx = EvalContext::with_config(EngineConfig::new().with_strict_mode(true));
        let err = ctx.set_binding("word", JsValue::from("Hello")).unwrap_err();
        assert_eq!(
            err,
            JErrorType::ReferenceError("word is not defined".to_string())
        );
    }

    #[test]
    fn frames_beyond_the_limit_are_rejected() {
        let mut ctx = EvalContext::with_config(EngineConfig::new().with_max_call_depth(2));
        for _ in 0..2 {
            let frame = ExecutionContext::new(
                "f".to_string(),
                JsValue::Undefined,
                ctx.global_env.clone(),
                false,
            );
            ctx.push_execution_ctx(frame).unwrap();
        }
        let frame = ExecutionContext::new("f".to_string(), JsValue::Undefined, ctx.global_env.clone(), false);
        assert!(matches!(
            ctx.push_execution_ctx(frame),
            Err(JErrorType::RangeError(_))
        ));
    }

    #[test]
    fn block_scope_shadows_and_restores() {
        let mut ctx = EvalContext::new();
        ctx.declare_lexical("x", JsValue::from(1), true).unwrap();
        let previous = ctx.push_block_scope();
        ctx.declare_lexical("x", JsValue::from(2), true).unwrap();
        assert_eq!(ctx.get_binding("x").unwrap(), JsValue::from(2));
        ctx.pop_block_scope(previous);
        assert_eq!(ctx.get_binding("x").unwrap(), JsValue::from(1));
    }

    #[test]
    fn console_lines_are_captured() {
        let mut ctx = EvalContext::new();
        ctx.write_console("Steve".to_string(), false);
        assert_eq!(ctx.console_output(), &["Steve".to_string()]);
        assert_eq!(ctx.take_console_output(), vec!["Steve".to_string()]);
        assert!(ctx.console_output().is_empty());
    }
}
