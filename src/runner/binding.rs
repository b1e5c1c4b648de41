//! Receiver (`this`) resolution.
//!
//! Every invocation is described by an [`Invocation`]: the function being called, the
//! syntactic [`CallForm`] of the call and its arguments. [`resolve`] maps it to the receiver
//! the callee's frame will see, checking the rules in a fixed order:
//!
//! 1. arrow functions use the receiver captured where they were created,
//! 2. functions produced by `bind` use their bound receiver, whatever the call form,
//! 3. `new` allocates a fresh object,
//! 4. `call`/`apply` use the supplied receiver as is,
//! 5. `obj.method()` uses `obj`,
//! 6. a plain call uses the global object, or `undefined` in strict code.

use std::fmt;

use crate::runner::ds::function_object::{JsFunctionObject, ThisMode};
use crate::runner::ds::object::{object_create, JsObject, JsObjectType};
use crate::runner::ds::operations::object::PROPERTY_PROTOTYPE;
use crate::runner::ds::value::JsValue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplicitVia {
    Call,
    Apply,
    /// A bound function forwarding to its target.
    BoundTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallForm {
    /// `f()`
    Plain,
    /// `base.f()` or `base[key]()`, with `base` evaluated at call time.
    Method { base: JsValue },
    Explicit { receiver: JsValue, via: ExplicitVia },
    /// `new F()`
    Constructor,
}
impl CallForm {
    pub fn is_construct(&self) -> bool {
        matches!(self, CallForm::Constructor)
    }
}
impl fmt::Display for CallForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallForm::Plain => "plain",
            CallForm::Method { .. } => "method",
            CallForm::Explicit {
                via: ExplicitVia::Call,
                ..
            } => "call",
            CallForm::Explicit {
                via: ExplicitVia::Apply,
                ..
            } => "apply",
            CallForm::Explicit {
                via: ExplicitVia::BoundTarget,
                ..
            } => "bound-target",
            CallForm::Constructor => "new",
        };
        write!(f, "{}", label)
    }
}

pub struct Invocation<'a> {
    pub callee: &'a JsFunctionObject,
    pub form: &'a CallForm,
    pub arguments: &'a [JsValue],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThisRule {
    Lexical,
    Bound,
    Construct,
    Explicit(ExplicitVia),
    Implicit,
    DefaultGlobal,
    DefaultUndefined,
}
impl fmt::Display for ThisRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThisRule::Lexical => write!(f, "lexical"),
            ThisRule::Bound => write!(f, "bound"),
            ThisRule::Construct => write!(f, "construct"),
            ThisRule::Explicit(via) => write!(f, "explicit({:?})", via),
            ThisRule::Implicit => write!(f, "implicit"),
            ThisRule::DefaultGlobal => write!(f, "default-global"),
            ThisRule::DefaultUndefined => write!(f, "default-undefined"),
        }
    }
}

/// What the resolver needs to know about the engine.
pub struct BindingEnvironment {
    pub strict_mode: bool,
    pub global_this: JsValue,
}

pub struct Resolution {
    pub this_value: JsValue,
    pub rule: ThisRule,
    /// Object allocated for constructor form.
    pub constructed: Option<JsObjectType>,
}
impl Resolution {
    fn of(this_value: JsValue, rule: ThisRule) -> Self {
        Resolution {
            this_value,
            rule,
            constructed: None,
        }
    }
}

pub fn resolve(invocation: &Invocation, env: &BindingEnvironment) -> Resolution {
    let callee = invocation.callee;
    if let ThisMode::Lexical(captured) = &callee.this_mode {
        Resolution::of(captured.clone(), ThisRule::Lexical)
    } else if let Some(bound) = &callee.bound_this {
        Resolution::of(bound.clone(), ThisRule::Bound)
    } else {
        match invocation.form {
            CallForm::Constructor => {
                let prototype = match callee.get_own_property(PROPERTY_PROTOTYPE) {
                    Some(JsValue::Object(p)) => Some(p.clone()),
                    _ => None,
                };
                let fresh = object_create(prototype);
                Resolution {
                    this_value: JsValue::Object(fresh.clone()),
                    rule: ThisRule::Construct,
                    constructed: Some(fresh),
                }
            }
            CallForm::Explicit { receiver, via } => {
                Resolution::of(receiver.clone(), ThisRule::Explicit(*via))
            }
            CallForm::Method { base } => Resolution::of(base.clone(), ThisRule::Implicit),
            CallForm::Plain => {
                if env.strict_mode || callee.strict {
                    Resolution::of(JsValue::Undefined, ThisRule::DefaultUndefined)
                } else {
                    Resolution::of(env.global_this.clone(), ThisRule::DefaultGlobal)
                }
            }
        }
    }
}

/// Result of a constructor-form call: an object returned by the body wins, otherwise the
/// allocated object (or, for bound functions, the bound receiver).
pub fn complete_construct(resolution: &Resolution, returned: JsValue) -> JsValue {
    if returned.is_object() {
        return returned;
    }
    match &resolution.constructed {
        Some(fresh) => JsValue::Object(fresh.clone()),
        None => resolution.this_value.clone(),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::runner::ds::error::JErrorType;
    use crate::runner::ds::object::object_create;
    use crate::runner::ds::operations::object::{get, put};
    use crate::runner::plugin::types::EvalContext;

    fn noop(_ctx: &mut EvalContext, _this: JsValue, _args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
        Ok(JsValue::Undefined)
    }

    fn dynamic_fn() -> JsFunctionObject {
        JsFunctionObject::new_native_function("f".to_string(), noop, None)
    }

    fn sloppy_env() -> (BindingEnvironment, JsObjectType) {
        let global = object_create(None);
        (
            BindingEnvironment {
                strict_mode: false,
                global_this: JsValue::Object(global.clone()),
            },
            global,
        )
    }

    fn resolve_with(callee: &JsFunctionObject, form: CallForm, env: &BindingEnvironment) -> Resolution {
        resolve(
            &Invocation {
                callee,
                form: &form,
                arguments: &[],
            },
            env,
        )
    }

    fn new_receiver(name: &str) -> JsValue {
        let o = object_create(None);
        put(&o, "name", JsValue::from(name));
        JsValue::Object(o)
    }

    #[test]
    fn method_form_uses_the_base() {
        let (env, _) = sloppy_env();
        let steve = new_receiver("Steve");
        let r = resolve_with(&dynamic_fn(), CallForm::Method { base: steve.clone() }, &env);
        assert_eq!(r.rule, ThisRule::Implicit);
        assert_eq!(r.this_value, steve);
    }

    #[test]
    fn plain_form_falls_back_to_global_or_undefined() {
        let (env, global) = sloppy_env();
        let r = resolve_with(&dynamic_fn(), CallForm::Plain, &env);
        assert_eq!(r.rule, ThisRule::DefaultGlobal);
        assert_eq!(r.this_value, JsValue::Object(global.clone()));

        let strict_env = BindingEnvironment {
            strict_mode: true,
            global_this: JsValue::Object(global),
        };
        let r = resolve_with(&dynamic_fn(), CallForm::Plain, &strict_env);
        assert_eq!(r.rule, ThisRule::DefaultUndefined);
        assert_eq!(r.this_value, JsValue::Undefined);
    }

    #[test]
    fn strict_callee_gets_undefined_in_sloppy_engine() {
        let (env, _) = sloppy_env();
        let mut f = dynamic_fn();
        f.strict = true;
        let r = resolve_with(&f, CallForm::Plain, &env);
        assert_eq!(r.this_value, JsValue::Undefined);
    }

    #[test]
    fn explicit_receiver_is_not_normalized() {
        let (env, _) = sloppy_env();
        for receiver in [JsValue::Undefined, JsValue::Null, JsValue::from(5)] {
            let r = resolve_with(
                &dynamic_fn(),
                CallForm::Explicit {
                    receiver: receiver.clone(),
                    via: ExplicitVia::Apply,
                },
                &env,
            );
            assert_eq!(r.rule, ThisRule::Explicit(ExplicitVia::Apply));
            assert_eq!(r.this_value, receiver);
        }
    }

    #[test]
    fn constructor_form_allocates_with_prototype() {
        let (env, _) = sloppy_env();
        let proto = object_create(None);
        put(&proto, "kind", JsValue::from("zebra"));
        let mut f = dynamic_fn();
        f.object_base
            .define_own_property("prototype".to_string(), JsValue::Object(proto));
        let r = resolve_with(&f, CallForm::Constructor, &env);
        assert_eq!(r.rule, ThisRule::Construct);
        let fresh = r.constructed.clone().unwrap();
        assert_eq!(r.this_value, JsValue::Object(fresh.clone()));
        assert_eq!(get(&fresh, "kind"), JsValue::from("zebra"));
    }

    #[test]
    fn bound_receiver_beats_every_form() {
        let (env, _) = sloppy_env();
        let target = object_create(None);
        let jim = new_receiver("Jim");
        let bound = JsFunctionObject::new_bound_function(target, "f", true, jim.clone(), vec![], None);
        assert_eq!(bound.name, "bound f");
        let forms = vec![
            CallForm::Plain,
            CallForm::Method {
                base: new_receiver("Stacy"),
            },
            CallForm::Explicit {
                receiver: new_receiver("Jack"),
                via: ExplicitVia::Call,
            },
            CallForm::Constructor,
        ];
        for form in forms {
            let r = resolve_with(&bound, form, &env);
            assert_eq!(r.rule, ThisRule::Bound);
            assert_eq!(r.this_value, jim);
            assert!(r.constructed.is_none());
        }
    }

    #[test]
    fn arrow_receiver_is_captured_and_wins() {
        let (env, _) = sloppy_env();
        let outer = new_receiver("outer");
        let mut arrow = dynamic_fn();
        arrow.this_mode = ThisMode::Lexical(outer.clone());
        arrow.bound_this = Some(new_receiver("ignored"));
        let r = resolve_with(
            &arrow,
            CallForm::Explicit {
                receiver: new_receiver("other"),
                via: ExplicitVia::Call,
            },
            &env,
        );
        assert_eq!(r.rule, ThisRule::Lexical);
        assert_eq!(r.this_value, outer);
    }

    #[test]
    fn construct_completion_prefers_returned_objects() {
        let (env, _) = sloppy_env();
        let r = resolve_with(&dynamic_fn(), CallForm::Constructor, &env);
        let fresh = r.this_value.clone();
        assert_eq!(complete_construct(&r, JsValue::from(42)), fresh);
        let replacement = new_receiver("other");
        assert_eq!(complete_construct(&r, replacement.clone()), replacement);

        let bound = Resolution::of(new_receiver("Jim"), ThisRule::Bound);
        assert_eq!(complete_construct(&bound, JsValue::Undefined), bound.this_value);
    }

    #[test]
    fn call_forms_have_short_labels() {
        assert_eq!(CallForm::Plain.to_string(), "plain");
        assert_eq!(CallForm::Constructor.to_string(), "new");
        assert_eq!(
            CallForm::Explicit {
                receiver: JsValue::Undefined,
                via: ExplicitVia::BoundTarget
            }
            .to_string(),
            "bound-target"
        );
        assert_eq!(ThisRule::DefaultGlobal.to_string(), "default-global");
    }
}
