//! Type interning for structural deduplication.
//!
//! This module converts `TypeData` structures into lightweight `TypeId`
//! handles:
//! - O(1) type equality (just compare `TypeId` values)
//! - each unique structure stored once
//! - safe to share across threads; all tables are behind `RwLock`s and
//!   structural keys are spread over shards to reduce contention
//!
//! Union and intersection construction normalizes its members, so every
//! `TypeId` for a union is already flat, deduplicated and canonically
//! ordered.

use crate::proto::{DescriptorRef, EnumDescriptor, MessageDescriptor};
use crate::types::*;
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use soyc_common::{Atom, ShardedInterner};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
const TYPE_LIST_INLINE: usize = 8;

type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    index_to_key: RwLock<Vec<TypeData>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }
        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }
        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }
        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// Type interning table.
/// Thread-safe via `RwLock` for concurrent access.
pub struct TypeInterner {
    shards: [TypeShard; SHARD_COUNT],
    /// Property names, parameter names and string literal values.
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    record_shapes: RwLock<ValueInterner<RecordShape>>,
    template_shapes: RwLock<ValueInterner<TemplateShape>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            type_lists: RwLock::new(SliceInterner::new()),
            record_shapes: RwLock::new(ValueInterner::new()),
            template_shapes: RwLock::new(ValueInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
        }
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().expect("type_lists lock poisoned");
        match lists.get(id.0) {
            Some(list) => list,
            None => panic!("type list {} was not produced by this interner", id.0),
        }
    }

    pub fn record_shape(&self, id: RecordShapeId) -> Arc<RecordShape> {
        let shapes = self.record_shapes.read().expect("record_shapes lock poisoned");
        match shapes.get(id.0) {
            Some(shape) => shape,
            None => panic!("record shape {} was not produced by this interner", id.0),
        }
    }

    pub fn template_shape(&self, id: TemplateShapeId) -> Arc<TemplateShape> {
        let shapes = self.template_shapes.read().expect("template_shapes lock poisoned");
        match shapes.get(id.0) {
            Some(shape) => shape,
            None => panic!("template shape {} was not produced by this interner", id.0),
        }
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape> {
        let shapes = self.function_shapes.read().expect("function_shapes lock poisoned");
        match shapes.get(id.0) {
            Some(shape) => shape,
            None => panic!("function shape {} was not produced by this interner", id.0),
        }
    }

    /// Intern a `TypeData` and return its `TypeId`.
    /// If the data already exists, returns the existing `TypeId`.
    ///
    /// Unions and intersections must go through [`Self::union`] and
    /// [`Self::intersection`], which normalize their members first.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = Self::get_intrinsic_id(&data) {
            return id;
        }

        let mut hasher = FxHasher::default();
        data.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard.key_to_index.read().expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&data) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard.key_to_index.write().expect("shard key_to_index lock poisoned");
        let mut storage = shard.index_to_key.write().expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&data) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        assert!(
            local_index <= ((u32::MAX - TypeId::FIRST_USER) >> SHARD_BITS),
            "type interner shard {shard_idx} is full"
        );

        storage.push(data.clone());
        map.insert(data, local_index);
        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the `TypeData` for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return Self::get_intrinsic_data(id);
        }

        let raw_val = id.0 - TypeId::FIRST_USER;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard.index_to_key.read().expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    /// Like [`Self::lookup`], for ids known to come from this interner.
    ///
    /// # Panics
    /// If `id` was not produced by this interner.
    pub fn data(&self, id: TypeId) -> TypeData {
        match self.lookup(id) {
            Some(data) => data,
            None => panic!("{id:?} was not produced by this interner"),
        }
    }

    pub fn kind(&self, id: TypeId) -> Kind {
        self.data(id).kind()
    }

    /// Get the number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        let mut total = TypeId::FIRST_USER as usize;
        for shard in &self.shards {
            total += shard.index_to_key.read().expect("shard index_to_key lock poisoned").len();
        }
        total
    }

    /// Check if the interner only has intrinsics.
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    fn get_intrinsic_id(data: &TypeData) -> Option<TypeId> {
        match data {
            TypeData::Error => Some(TypeId::ERROR),
            TypeData::Intrinsic(kind) => Some(kind.to_type_id()),
            TypeData::Element(ElementTag::Wildcard) => Some(TypeId::ELEMENT),
            TypeData::Element(ElementTag::Any) => Some(TypeId::ANY_ELEMENT),
            TypeData::ProtoEnum(EnumRef::Any) => Some(TypeId::ANY_ENUM),
            TypeData::ProtoEnum(EnumRef::Unknown) => Some(TypeId::UNKNOWN_ENUM),
            _ => None,
        }
    }

    fn get_intrinsic_data(id: TypeId) -> Option<TypeData> {
        match id {
            TypeId::ERROR => Some(TypeData::Error),
            TypeId::ELEMENT => Some(TypeData::Element(ElementTag::Wildcard)),
            TypeId::ANY_ELEMENT => Some(TypeData::Element(ElementTag::Any)),
            TypeId::ANY_ENUM => Some(TypeData::ProtoEnum(EnumRef::Any)),
            TypeId::UNKNOWN_ENUM => Some(TypeData::ProtoEnum(EnumRef::Unknown)),
            _ => IntrinsicKind::ALL
                .iter()
                .find(|kind| kind.to_type_id() == id)
                .map(|&kind| TypeData::Intrinsic(kind)),
        }
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        let mut lists = self.type_lists.write().expect("type_lists lock poisoned");
        TypeListId(lists.intern(members))
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        kind.to_type_id()
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(atom))
    }

    /// `html<tag>`. `?` is the wildcard element and `any` the unknown element.
    pub fn element(&self, tag_name: &str) -> TypeId {
        match tag_name {
            "" | "?" => TypeId::ELEMENT,
            "any" => TypeId::ANY_ELEMENT,
            name => {
                let atom = self.intern_string(name);
                self.intern(TypeData::Element(ElementTag::Named(atom)))
            }
        }
    }

    pub fn list(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::List(element))
    }

    pub fn set(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Set(element))
    }

    pub fn iterable(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Iterable(element))
    }

    pub fn map(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::Map(key, value))
    }

    pub fn legacy_object_map(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::LegacyObjectMap(key, value))
    }

    /// The `number` alias: `int|float`.
    pub fn number(&self) -> TypeId {
        self.union2(TypeId::INT, TypeId::FLOAT)
    }

    /// Intern a record. Property names must be unique.
    pub fn record(&self, properties: Vec<RecordProperty>) -> TypeId {
        debug_assert!(
            {
                let mut names: Vec<Atom> = properties.iter().map(|p| p.name).collect();
                names.sort();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "record property names must be unique"
        );
        let shape = RecordShape { properties };
        let id = self
            .record_shapes
            .write()
            .expect("record_shapes lock poisoned")
            .intern(shape);
        self.intern(TypeData::Record(RecordShapeId(id)))
    }

    pub fn template(&self, parameters: Vec<TemplateParameter>, return_type: TypeId) -> TypeId {
        let shape = TemplateShape {
            parameters,
            return_type,
        };
        let id = self
            .template_shapes
            .write()
            .expect("template_shapes lock poisoned")
            .intern(shape);
        self.intern(TypeData::Template(TemplateShapeId(id)))
    }

    pub fn function(&self, parameters: Vec<FunctionParameter>, return_type: TypeId) -> TypeId {
        let shape = FunctionShape {
            parameters,
            return_type,
        };
        let id = self
            .function_shapes
            .write()
            .expect("function_shapes lock poisoned")
            .intern(shape);
        self.intern(TypeData::Function(FunctionShapeId(id)))
    }

    pub fn proto_message(&self, descriptor: DescriptorRef<MessageDescriptor>) -> TypeId {
        self.intern(TypeData::ProtoMessage(descriptor))
    }

    pub fn proto_enum(&self, descriptor: DescriptorRef<EnumDescriptor>) -> TypeId {
        self.intern(TypeData::ProtoEnum(EnumRef::Descriptor(descriptor)))
    }

    // =========================================================================
    // Unions
    // =========================================================================

    /// Intern a union type, normalizing and deduplicating members.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        self.union_from_iter(members)
    }

    pub fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.union_from_iter([left, right])
    }

    fn union_from_iter<I>(&self, members: I) -> TypeId
    where
        I: IntoIterator<Item = TypeId>,
    {
        let mut iter = members.into_iter();
        let Some(first) = iter.next() else {
            return TypeId::NEVER;
        };
        let Some(second) = iter.next() else {
            return first;
        };

        let mut flat: TypeListBuffer = SmallVec::new();
        self.push_union_member(&mut flat, first);
        self.push_union_member(&mut flat, second);
        for member in iter {
            self.push_union_member(&mut flat, member);
        }

        self.normalize_union(flat)
    }

    fn push_union_member(&self, flat: &mut TypeListBuffer, member: TypeId) {
        if let Some(TypeData::Union(inner)) = self.lookup(member) {
            flat.extend(self.type_list(inner).iter().copied());
        } else {
            flat.push(member);
        }
    }

    fn normalize_union(&self, mut flat: TypeListBuffer) -> TypeId {
        flat.sort_by_key(|id| id.0);
        flat.dedup();

        if flat.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|id| *id != TypeId::NEVER);
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list_id = self.intern_type_list(flat.into_vec());
                self.intern(TypeData::Union(list_id))
            }
        }
    }

    // =========================================================================
    // Intersections
    // =========================================================================

    /// Intern an intersection type, normalizing and deduplicating members.
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        self.intersection_from_iter(members)
    }

    pub fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intersection_from_iter([left, right])
    }

    fn intersection_from_iter<I>(&self, members: I) -> TypeId
    where
        I: IntoIterator<Item = TypeId>,
    {
        let mut iter = members.into_iter();
        let Some(first) = iter.next() else {
            return TypeId::UNKNOWN;
        };
        let Some(second) = iter.next() else {
            return first;
        };

        let mut flat: TypeListBuffer = SmallVec::new();
        self.push_intersection_member(&mut flat, first);
        self.push_intersection_member(&mut flat, second);
        for member in iter {
            self.push_intersection_member(&mut flat, member);
        }

        self.normalize_intersection(flat)
    }

    fn push_intersection_member(&self, flat: &mut TypeListBuffer, member: TypeId) {
        if let Some(TypeData::Intersection(inner)) = self.lookup(member) {
            flat.extend(self.type_list(inner).iter().copied());
        } else {
            flat.push(member);
        }
    }

    fn normalize_intersection(&self, mut flat: TypeListBuffer) -> TypeId {
        flat.sort_by_key(|id| id.0);
        flat.dedup();

        if flat.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        // `?` is the identity of intersection.
        flat.retain(|id| *id != TypeId::UNKNOWN);
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => {
                let list_id = self.intern_type_list(flat.into_vec());
                self.intern(TypeData::Intersection(list_id))
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Members of a union, or the type itself for non-unions.
    pub fn union_members(&self, id: TypeId) -> SmallVec<[TypeId; TYPE_LIST_INLINE]> {
        match self.lookup(id) {
            Some(TypeData::Union(list)) => self.type_list(list).iter().copied().collect(),
            _ => smallvec::smallvec![id],
        }
    }

    /// Remove `null` and `undefined` from a type.
    pub fn remove_nullish(&self, id: TypeId) -> TypeId {
        let members = self.union_members(id);
        if !members.iter().any(|m| matches!(*m, TypeId::NULL | TypeId::UNDEFINED)) {
            return id;
        }
        self.union_from_iter(
            members
                .into_iter()
                .filter(|m| !matches!(*m, TypeId::NULL | TypeId::UNDEFINED)),
        )
    }

    pub fn is_nullable(&self, id: TypeId) -> bool {
        self.union_members(id)
            .iter()
            .any(|m| matches!(*m, TypeId::NULL | TypeId::UNDEFINED))
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
