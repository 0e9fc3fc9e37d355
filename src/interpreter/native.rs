use super::{scope::ScopeChain, SystemContext};
use crate::value::{error::RuntimeErrorKind, Value};
use compact_str::{CompactString, ToCompactString};
use std::collections::HashMap;

pub trait NativeFunction: std::fmt::Debug {
    fn get_name(&self) -> &'static str;
    fn call(
        &self,
        context: &mut dyn SystemContext,
        scopes: &mut ScopeChain,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind>;
}

fn expect_single(name: &'static str, arguments: Vec<Value>) -> Result<Value, RuntimeErrorKind> {
    let actual = arguments.len();
    let mut arguments = arguments.into_iter();
    match (arguments.next(), arguments.next()) {
        (Some(argument), None) => Ok(argument),
        _ => Err(RuntimeErrorKind::InvalidArgumentCount {
            function: name.into(),
            actual,
            expected: 1,
        }),
    }
}

fn emit(context: &mut dyn SystemContext, text: &str) -> Result<(), RuntimeErrorKind> {
    context
        .write(text)
        .map_err(|error| RuntimeErrorKind::OutputFailed(error.to_compact_string()))
}

fn count(arguments: &[Value]) -> Value {
    Value::Int(arguments.len() as i64)
}

/// Writes every argument back to back.
#[derive(Debug)]
pub struct NativePrint;

impl NativeFunction for NativePrint {
    fn get_name(&self) -> &'static str {
        "print"
    }

    fn call(
        &self,
        context: &mut dyn SystemContext,
        _scopes: &mut ScopeChain,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind> {
        let text: String = arguments.iter().map(|v| v.to_string()).collect();
        emit(context, &text)?;
        Ok(count(&arguments))
    }
}

/// Writes every argument on its own line.
#[derive(Debug)]
pub struct NativePrintln;

impl NativeFunction for NativePrintln {
    fn get_name(&self) -> &'static str {
        "println"
    }

    fn call(
        &self,
        context: &mut dyn SystemContext,
        _scopes: &mut ScopeChain,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind> {
        if arguments.is_empty() {
            emit(context, "\n")?;
            return Ok(count(&arguments));
        }
        let mut text = String::new();
        for argument in arguments.iter() {
            text.push_str(&argument.to_string());
            text.push('\n');
        }
        emit(context, &text)?;
        Ok(count(&arguments))
    }
}

#[derive(Debug)]
pub struct NativeInput;

impl NativeFunction for NativeInput {
    fn get_name(&self) -> &'static str {
        "input"
    }

    fn call(
        &self,
        context: &mut dyn SystemContext,
        _scopes: &mut ScopeChain,
        _arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind> {
        let token = context.read_token().unwrap_or_default();
        Ok(Value::String(token.into()))
    }
}

#[derive(Debug)]
pub struct NativeTypeof;

impl NativeFunction for NativeTypeof {
    fn get_name(&self) -> &'static str {
        "typeof"
    }

    fn call(
        &self,
        _context: &mut dyn SystemContext,
        _scopes: &mut ScopeChain,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind> {
        let argument = expect_single(self.get_name(), arguments)?;
        Ok(Value::String(argument.kind().to_compact_string()))
    }
}

#[derive(Debug)]
pub struct NativeLength;

impl NativeFunction for NativeLength {
    fn get_name(&self) -> &'static str {
        "length"
    }

    fn call(
        &self,
        _context: &mut dyn SystemContext,
        _scopes: &mut ScopeChain,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeErrorKind> {
        match expect_single(self.get_name(), arguments)? {
            Value::String(text) => Ok(Value::Int(text.chars().count() as i64)),
            Value::Array(elements) => Ok(Value::Int(elements.len() as i64)),
            other => Err(RuntimeErrorKind::InvalidArgument {
                function: self.get_name().into(),
                kind: other.kind(),
            }),
        }
    }
}

/// Name to native procedure table, fixed once constructed.
#[derive(Debug)]
pub struct Builtins {
    functions: HashMap<CompactString, Box<dyn NativeFunction>>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

impl Builtins {
    pub fn new() -> Self {
        let natives: [Box<dyn NativeFunction>; 5] = [
            Box::new(NativePrint),
            Box::new(NativePrintln),
            Box::new(NativeInput),
            Box::new(NativeTypeof),
            Box::new(NativeLength),
        ];
        let functions: HashMap<CompactString, Box<dyn NativeFunction>> = natives
            .into_iter()
            .map(|native| (native.get_name().into(), native))
            .collect();
        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<&dyn NativeFunction> {
        self.functions.get(name).map(|native| native.as_ref())
    }
}
