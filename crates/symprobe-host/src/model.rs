//! Declarations held by a [`SymbolTable`](crate::table::SymbolTable).
//!
//! These are plain serde documents so a table can be loaded from JSON:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "com.example.Callers",
//!       "methods": [
//!         { "name": "getCallerClass", "signature": "(int)->Class", "static": true }
//!       ],
//!       "fields": [
//!         { "name": "depth", "type": "int", "final": true }
//!       ],
//!       "constructors": [ { "params": [] } ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use symprobe_types::{Signature, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub signature: Signature,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl MethodDef {
    pub fn instance(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            is_static: false,
            visibility: Visibility::Public,
        }
    }

    pub fn static_method(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            is_static: true,
            ..Self::instance(name, signature)
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueKind,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl FieldDef {
    pub fn instance(name: impl Into<String>, value_type: ValueKind) -> Self {
        Self {
            name: name.into(),
            value_type,
            is_static: false,
            is_final: false,
            visibility: Visibility::Public,
        }
    }

    pub fn static_field(name: impl Into<String>, value_type: ValueKind) -> Self {
        Self {
            is_static: true,
            ..Self::instance(name, value_type)
        }
    }

    pub fn immutable(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorDef {
    #[serde(default)]
    pub params: Vec<ValueKind>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl ConstructorDef {
    pub fn new(params: impl IntoIterator<Item = ValueKind>) -> Self {
        Self {
            params: params.into_iter().collect(),
            visibility: Visibility::Public,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// One owning type and its members.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }
}

/// Top-level JSON document of a symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(default)]
    pub types: Vec<TypeDef>,
}
