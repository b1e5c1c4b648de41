use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::env_record::EnvironmentRecordType;

pub type JsLexEnvironmentType = Rc<RefCell<LexEnvironment>>;

pub struct LexEnvironment {
    pub inner: Box<EnvironmentRecordType>,
    pub outer: Option<JsLexEnvironmentType>,
}
