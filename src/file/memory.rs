use std::collections::HashMap;

use super::{CodeData, EntityId, LiteralArray, LiteralRef, PandaFile};
use crate::{Error::EntityNotFound, Result};

const FIRST_ENTITY_OFFSET: u32 = 0x40;
const ENTITY_STRIDE: u32 = 0x10;

#[derive(Debug)]
struct ClassEntry {
    descriptor: String,
    external: bool,
    methods: Vec<EntityId>,
}

#[derive(Debug)]
struct MethodEntry {
    class: EntityId,
    name: String,
    function_kind: u8,
    code: Option<EntityId>,
    abstract_or_native: bool,
}

#[derive(Debug)]
struct CodeEntry {
    num_vregs: u32,
    num_args: u32,
    instructions: Vec<u8>,
}

/// A panda file held entirely in memory.
///
/// Entities get synthetic, strictly increasing offsets in creation order. 16-bit instruction
/// operands resolve through one file-wide index table shared by methods and literal arrays.
#[derive(Debug)]
pub struct MemoryFile {
    filename: String,
    class_order: Vec<EntityId>,
    classes: HashMap<EntityId, ClassEntry>,
    methods: HashMap<EntityId, MethodEntry>,
    code: HashMap<EntityId, CodeEntry>,
    literals: HashMap<EntityId, LiteralArray>,
    legacy_literals: Vec<EntityId>,
    index: Vec<EntityId>,
}

impl MemoryFile {
    fn class(&self, class: EntityId) -> Result<&ClassEntry> {
        self.classes.get(&class).ok_or(EntityNotFound(class))
    }

    fn method(&self, method: EntityId) -> Result<&MethodEntry> {
        self.methods.get(&method).ok_or(EntityNotFound(method))
    }

    fn resolve_index(&self, index: u16) -> Result<EntityId> {
        self.index
            .get(usize::from(index))
            .copied()
            .ok_or(EntityNotFound(EntityId(u32::from(index))))
    }
}

impl PandaFile for MemoryFile {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn classes(&self) -> Result<Vec<EntityId>> {
        Ok(self.class_order.clone())
    }

    fn is_external(&self, class: EntityId) -> Result<bool> {
        Ok(self.class(class)?.external)
    }

    fn class_descriptor(&self, class: EntityId) -> Result<&str> {
        Ok(&self.class(class)?.descriptor)
    }

    fn class_methods(&self, class: EntityId) -> Result<Vec<EntityId>> {
        Ok(self.class(class)?.methods.clone())
    }

    fn method_class(&self, method: EntityId) -> Result<EntityId> {
        Ok(self.method(method)?.class)
    }

    fn method_name(&self, method: EntityId) -> Result<&str> {
        Ok(&self.method(method)?.name)
    }

    fn method_function_kind(&self, method: EntityId) -> Result<u8> {
        Ok(self.method(method)?.function_kind)
    }

    fn method_code(&self, method: EntityId) -> Result<Option<EntityId>> {
        Ok(self.method(method)?.code)
    }

    fn method_is_abstract_or_native(&self, method: EntityId) -> Result<bool> {
        Ok(self.method(method)?.abstract_or_native)
    }

    fn code(&self, code: EntityId) -> Result<CodeData<'_>> {
        let entry = self.code.get(&code).ok_or(EntityNotFound(code))?;
        Ok(CodeData {
            num_vregs: entry.num_vregs,
            num_args: entry.num_args,
            instructions: &entry.instructions,
        })
    }

    fn resolve_method_index(&self, method: EntityId, index: u16) -> Result<EntityId> {
        self.method(method)?;
        self.resolve_index(index)
    }

    fn resolve_literal_index(&self, method: EntityId, index: u16) -> Result<EntityId> {
        self.method(method)?;
        self.resolve_index(index)
    }

    fn literal_array(&self, literal: LiteralRef) -> Result<LiteralArray> {
        let id = match literal {
            LiteralRef::Entity(id) => id,
            LiteralRef::Index(index) => *self
                .legacy_literals
                .get(index as usize)
                .ok_or(EntityNotFound(EntityId(index)))?,
        };

        self.literals.get(&id).cloned().ok_or(EntityNotFound(id))
    }
}

/// Builder for [`MemoryFile`].
///
/// # Examples
///
/// ```rust
/// use abcscope::bytecode::BytecodeEncoder;
/// use abcscope::file::{MemoryFileBuilder, PandaFile};
/// use abcscope::isa::Opcode;
///
/// let mut builder = MemoryFileBuilder::new("closures.abc");
/// let class = builder.add_class("Lclosures;", false);
/// let main = builder.add_method(class, "func_main_0");
/// let inner = builder.add_method(class, "inner");
/// let index = builder.index_entity(inner)?;
///
/// let mut code = BytecodeEncoder::new();
/// code.emit(Opcode::DefineFuncImm8Id16Imm8, &[0, i64::from(index), 0])?
///     .emit(Opcode::ReturnUndefined, &[])?;
/// builder.set_code(main, 2, 3, code.finish());
///
/// let file = builder.build();
/// assert_eq!(file.resolve_method_index(main, index)?, inner);
/// # Ok::<(), abcscope::Error>(())
/// ```
#[derive(Debug)]
pub struct MemoryFileBuilder {
    file: MemoryFile,
    next_offset: u32,
}

impl MemoryFileBuilder {
    /// Start an empty file.
    #[must_use]
    pub fn new(filename: &str) -> Self {
        MemoryFileBuilder {
            file: MemoryFile {
                filename: filename.to_string(),
                class_order: Vec::new(),
                classes: HashMap::new(),
                methods: HashMap::new(),
                code: HashMap::new(),
                literals: HashMap::new(),
                legacy_literals: Vec::new(),
                index: Vec::new(),
            },
            next_offset: FIRST_ENTITY_OFFSET,
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_offset);
        self.next_offset += ENTITY_STRIDE;
        id
    }

    /// Declare a class.
    pub fn add_class(&mut self, descriptor: &str, external: bool) -> EntityId {
        let id = self.allocate();
        self.file.class_order.push(id);
        self.file.classes.insert(
            id,
            ClassEntry {
                descriptor: descriptor.to_string(),
                external,
                methods: Vec::new(),
            },
        );
        id
    }

    /// Declare a method of `class`, without code.
    pub fn add_method(&mut self, class: EntityId, name: &str) -> EntityId {
        let id = self.allocate();
        self.file.methods.insert(
            id,
            MethodEntry {
                class,
                name: name.to_string(),
                function_kind: 0,
                code: None,
                abstract_or_native: false,
            },
        );
        self.attach_method(class, id);
        id
    }

    /// List an already declared method in the method table of `class` as well.
    pub fn attach_method(&mut self, class: EntityId, method: EntityId) {
        if let Some(entry) = self.file.classes.get_mut(&class) {
            entry.methods.push(method);
        }
    }

    /// Give `method` a code block and return the code block's id.
    pub fn set_code(
        &mut self,
        method: EntityId,
        num_vregs: u32,
        num_args: u32,
        instructions: Vec<u8>,
    ) -> EntityId {
        let id = self.allocate();
        self.file.code.insert(
            id,
            CodeEntry {
                num_vregs,
                num_args,
                instructions,
            },
        );
        if let Some(entry) = self.file.methods.get_mut(&method) {
            entry.code = Some(id);
        }
        id
    }

    /// Set the raw function-kind byte of `method`.
    pub fn set_function_kind(&mut self, method: EntityId, raw: u8) {
        if let Some(entry) = self.file.methods.get_mut(&method) {
            entry.function_kind = raw;
        }
    }

    /// Mark `method` as abstract or native. Such methods have no code block.
    pub fn set_abstract_or_native(&mut self, method: EntityId, value: bool) {
        if let Some(entry) = self.file.methods.get_mut(&method) {
            entry.abstract_or_native = value;
        }
    }

    /// Add a literal array embedding `methods` and referencing `nested` literal arrays.
    pub fn add_literal_array(
        &mut self,
        methods: Vec<EntityId>,
        nested: Vec<LiteralRef>,
    ) -> EntityId {
        let id = self.allocate();
        self.file
            .literals
            .insert(id, LiteralArray { methods, nested });
        id
    }

    /// Make `literal` reachable through the legacy literal-array table and return its index.
    pub fn legacy_literal_index(&mut self, literal: EntityId) -> u32 {
        if let Some(index) = self.file.legacy_literals.iter().position(|id| *id == literal) {
            return index as u32;
        }
        self.file.legacy_literals.push(literal);
        (self.file.legacy_literals.len() - 1) as u32
    }

    /// Make `entity` addressable by 16-bit instruction operands and return its index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] once the index table holds `u16::MAX + 1` entries.
    pub fn index_entity(&mut self, entity: EntityId) -> Result<u16> {
        if let Some(index) = self.file.index.iter().position(|id| *id == entity) {
            return u16::try_from(index)
                .map_err(|_| malformed_error!("Index table overflow for {}", entity));
        }

        let index = u16::try_from(self.file.index.len())
            .map_err(|_| malformed_error!("Index table overflow for {}", entity))?;
        self.file.index.push(entity);
        Ok(index)
    }

    /// Finish the file.
    #[must_use]
    pub fn build(self) -> MemoryFile {
        self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_and_methods() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let local = builder.add_class("Lapp;", false);
        let external = builder.add_class("Lstd/core;", true);
        let first = builder.add_method(local, "func_main_0");
        let second = builder.add_method(local, "helper");
        builder.set_function_kind(second, 0x0c);
        let file = builder.build();

        assert_eq!(file.filename(), "test.abc");
        assert_eq!(file.classes().unwrap(), vec![local, external]);
        assert!(file.is_external(external).unwrap());
        assert!(!file.is_external(local).unwrap());
        assert_eq!(file.class_descriptor(local).unwrap(), "Lapp;");
        assert_eq!(file.class_methods(local).unwrap(), vec![first, second]);
        assert_eq!(file.method_class(second).unwrap(), local);
        assert_eq!(file.method_function_kind(second).unwrap(), 0x0c);
        assert_eq!(file.method_code(first).unwrap(), None);
        assert_eq!(file.num_methods().unwrap(), 2);
        assert!(first < second);
    }

    #[test]
    fn code_blocks() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let class = builder.add_class("Lapp;", false);
        let method = builder.add_method(class, "f");
        let code = builder.set_code(method, 4, 3, vec![0x64]);
        let file = builder.build();

        assert_eq!(file.method_code(method).unwrap(), Some(code));
        let data = file.code(code).unwrap();
        assert_eq!(data.num_vregs, 4);
        assert_eq!(data.num_args, 3);
        assert_eq!(data.code_size(), 1);
        assert!(matches!(file.code(method), Err(EntityNotFound(_))));
    }

    #[test]
    fn abstract_methods() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let class = builder.add_class("Lshape;", false);
        let area = builder.add_method(class, "area");
        let draw = builder.add_method(class, "draw");
        builder.set_abstract_or_native(area, true);
        let file = builder.build();

        assert!(file.method_is_abstract_or_native(area).unwrap());
        assert!(!file.method_is_abstract_or_native(draw).unwrap());
        assert_eq!(file.method_code(area).unwrap(), None);
        assert!(matches!(
            file.method_is_abstract_or_native(class),
            Err(EntityNotFound(_))
        ));
    }

    #[test]
    fn literal_arrays() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let class = builder.add_class("Lapp;", false);
        let method = builder.add_method(class, "m");
        let inner = builder.add_literal_array(vec![method], vec![]);
        let outer = builder.add_literal_array(vec![], vec![LiteralRef::Entity(inner)]);
        let legacy = builder.legacy_literal_index(outer);
        assert_eq!(builder.legacy_literal_index(outer), legacy);
        let file = builder.build();

        let resolved = file.literal_array(LiteralRef::Index(legacy)).unwrap();
        assert_eq!(resolved.nested, vec![LiteralRef::Entity(inner)]);
        assert_eq!(
            file.literal_array(LiteralRef::Entity(inner)).unwrap().methods,
            vec![method]
        );
        assert!(file.literal_array(LiteralRef::Index(9)).is_err());
        assert!(file.literal_array(LiteralRef::Entity(method)).is_err());
    }

    #[test]
    fn index_table() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let class = builder.add_class("Lapp;", false);
        let method = builder.add_method(class, "m");
        let literal = builder.add_literal_array(vec![], vec![]);

        assert_eq!(builder.index_entity(method).unwrap(), 0);
        assert_eq!(builder.index_entity(literal).unwrap(), 1);
        assert_eq!(builder.index_entity(method).unwrap(), 0);

        let file = builder.build();
        assert_eq!(file.resolve_method_index(method, 0).unwrap(), method);
        assert_eq!(file.resolve_literal_index(method, 1).unwrap(), literal);
        assert!(file.resolve_method_index(method, 2).is_err());
        assert!(file.resolve_method_index(class, 0).is_err());
    }

    #[test]
    fn attached_methods() {
        let mut builder = MemoryFileBuilder::new("test.abc");
        let first = builder.add_class("La;", false);
        let second = builder.add_class("Lb;", false);
        let method = builder.add_method(first, "shared");
        builder.attach_method(second, method);
        let file = builder.build();

        assert_eq!(file.class_methods(second).unwrap(), vec![method]);
        assert_eq!(file.method_class(method).unwrap(), first);
        assert_eq!(file.num_methods().unwrap(), 2);
    }
}
