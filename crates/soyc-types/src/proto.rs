//! Proto descriptors and the descriptor pool.
//!
//! Proto types are identified by descriptor *identity*: the `Arc` handed
//! out when a descriptor is registered. Two pools that register a message
//! under the same full name produce distinct, incompatible types.

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a registered descriptor. Equality and hashing are by
/// identity, never by name.
pub struct DescriptorRef<T>(Arc<T>);

impl<T> DescriptorRef<T> {
    fn new(value: T) -> Self {
        DescriptorRef(Arc::new(value))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for DescriptorRef<T> {
    fn clone(&self) -> Self {
        DescriptorRef(Arc::clone(&self.0))
    }
}

impl<T> Deref for DescriptorRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> PartialEq for DescriptorRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for DescriptorRef<T> {}

impl<T> Hash for DescriptorRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl<T: Named> fmt::Debug for DescriptorRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.0.full_name(), Arc::as_ptr(&self.0))
    }
}

/// Descriptors that have a fully qualified name.
pub trait Named {
    fn full_name(&self) -> &str;
}

/// Scalar and reference field types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
    String,
    Bytes,
    /// A message field, by full name of the message.
    Message(String),
    /// An enum field, by full name of the enum.
    Enum(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldLabel {
    Singular(FieldType),
    Repeated(FieldType),
    Map(FieldType, FieldType),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: i32,
    pub label: FieldLabel,
}

impl FieldDescriptor {
    pub fn singular(name: &str, number: i32, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            number,
            label: FieldLabel::Singular(field_type),
        }
    }

    pub fn repeated(name: &str, number: i32, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            number,
            label: FieldLabel::Repeated(field_type),
        }
    }

    pub fn map(name: &str, number: i32, key: FieldType, value: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            number,
            label: FieldLabel::Map(key, value),
        }
    }
}

#[derive(Debug)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn new(full_name: &str, fields: Vec<FieldDescriptor>) -> Self {
        MessageDescriptor {
            full_name: full_name.to_string(),
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Named for MessageDescriptor {
    fn full_name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug)]
pub struct EnumDescriptor {
    full_name: String,
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    pub fn new(full_name: &str, values: &[(&str, i32)]) -> Self {
        EnumDescriptor {
            full_name: full_name.to_string(),
            values: values
                .iter()
                .map(|&(name, number)| EnumValue {
                    name: name.to_string(),
                    number,
                })
                .collect(),
        }
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Number of the member called `name`.
    pub fn value_number(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|v| v.name == name).map(|v| v.number)
    }

    /// First member whose number is `number`.
    pub fn value_name(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.number == number)
            .map(|v| v.name.as_str())
    }
}

impl Named for EnumDescriptor {
    fn full_name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("descriptor '{0}' is already registered in this pool")]
    DuplicateName(String),
}

/// Registry of message and enum descriptors, keyed by full name.
///
/// Built single-threaded, then shared read-only (typically in an `Arc`)
/// across concurrently compiled units.
#[derive(Debug, Default)]
pub struct DescriptorPool {
    messages: IndexMap<String, DescriptorRef<MessageDescriptor>>,
    enums: IndexMap<String, DescriptorRef<EnumDescriptor>>,
}

impl DescriptorPool {
    pub fn new() -> Self {
        DescriptorPool::default()
    }

    pub fn add_message(
        &mut self,
        descriptor: MessageDescriptor,
    ) -> Result<DescriptorRef<MessageDescriptor>, DescriptorError> {
        let name = descriptor.full_name.clone();
        if self.messages.contains_key(&name) || self.enums.contains_key(&name) {
            return Err(DescriptorError::DuplicateName(name));
        }
        let handle = DescriptorRef::new(descriptor);
        self.messages.insert(name, handle.clone());
        Ok(handle)
    }

    pub fn add_enum(
        &mut self,
        descriptor: EnumDescriptor,
    ) -> Result<DescriptorRef<EnumDescriptor>, DescriptorError> {
        let name = descriptor.full_name.clone();
        if self.messages.contains_key(&name) || self.enums.contains_key(&name) {
            return Err(DescriptorError::DuplicateName(name));
        }
        let handle = DescriptorRef::new(descriptor);
        self.enums.insert(name, handle.clone());
        Ok(handle)
    }

    pub fn find_message(&self, full_name: &str) -> Option<DescriptorRef<MessageDescriptor>> {
        self.messages.get(full_name).cloned()
    }

    pub fn find_enum(&self, full_name: &str) -> Option<DescriptorRef<EnumDescriptor>> {
        self.enums.get(full_name).cloned()
    }

    /// Messages in registration order.
    pub fn messages(&self) -> impl Iterator<Item = &DescriptorRef<MessageDescriptor>> {
        self.messages.values()
    }

    /// Enums in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &DescriptorRef<EnumDescriptor>> {
        self.enums.values()
    }
}
