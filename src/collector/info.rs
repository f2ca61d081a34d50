//! Result containers of a collector run.
//!
//! [`BytecodeInfo`] is the per-file context every collector operation writes into. It owns
//! the interned record names, the append-only list of [`MethodPcInfo`] and the
//! [`MethodRegistry`], plus the side indices consumed by compiler backends.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::Arc,
};

/// How a method was first discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discovery {
    /// Listed by its class, or registered when its own body was scanned
    Enumerated,
    /// Referenced by a `definefunc`/`definemethod` instruction
    DefineFunction,
    /// Referenced by a class definition, as constructor or class member
    ClassDefinition,
    /// Embedded in an array or object literal
    LiteralBuffer,
}

/// Byte offsets of the instructions of one scanned method body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodPcInfo {
    pc_offsets: Vec<usize>,
    method_size: usize,
}

impl MethodPcInfo {
    /// Create an empty entry for a body of `method_size` bytes.
    #[must_use]
    pub fn new(method_size: usize) -> Self {
        MethodPcInfo {
            pc_offsets: Vec::new(),
            method_size,
        }
    }

    pub(crate) fn push(&mut self, pc: usize) {
        self.pc_offsets.push(pc);
    }

    /// Instruction offsets in program order.
    #[must_use]
    pub fn pc_offsets(&self) -> &[usize] {
        &self.pc_offsets
    }

    /// Size of the code block in bytes.
    #[must_use]
    pub fn method_size(&self) -> usize {
        self.method_size
    }

    /// Number of decoded instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pc_offsets.len()
    }

    /// Returns `true` for an empty body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pc_offsets.is_empty()
    }
}

/// Registry entry of one method offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    id: u32,
    pc_info_index: Option<usize>,
    record_name: Arc<str>,
    outer_method: Option<u32>,
    inner_methods: Vec<u32>,
    discovery: Discovery,
}

impl MethodInfo {
    /// Sequential id, assigned on first discovery.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Index of the method's [`MethodPcInfo`], or 0 while its body has not been scanned.
    #[must_use]
    pub fn pc_info_index(&self) -> usize {
        self.pc_info_index.unwrap_or(0)
    }

    /// Returns `true` once the method's body was scanned.
    #[must_use]
    pub fn is_scanned(&self) -> bool {
        self.pc_info_index.is_some()
    }

    /// Record that introduced the method.
    #[must_use]
    pub fn record_name(&self) -> &Arc<str> {
        &self.record_name
    }

    /// Id of the first method that referenced this one as an inner method.
    #[must_use]
    pub fn outer_method(&self) -> Option<u32> {
        self.outer_method
    }

    /// Offsets of the methods this one defines, in discovery order.
    #[must_use]
    pub fn inner_methods(&self) -> &[u32] {
        &self.inner_methods
    }

    /// How the method was first discovered.
    #[must_use]
    pub fn discovery(&self) -> Discovery {
        self.discovery
    }
}

/// Map of method offset to [`MethodInfo`].
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: BTreeMap<u32, MethodInfo>,
    next_id: u32,
}

impl MethodRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `offset` and return its id.
    ///
    /// Registering an offset again returns the existing id and changes nothing.
    pub fn register(&mut self, offset: u32, record_name: &Arc<str>, discovery: Discovery) -> u32 {
        if let Some(info) = self.methods.get(&offset) {
            return info.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.methods.insert(
            offset,
            MethodInfo {
                id,
                pc_info_index: None,
                record_name: Arc::clone(record_name),
                outer_method: None,
                inner_methods: Vec::new(),
                discovery,
            },
        );
        id
    }

    /// Link `inner` to the registered method `outer`.
    ///
    /// Both offsets must already be registered; unknown offsets and self references are
    /// ignored. An inner method keeps the first outer method it was linked to.
    pub fn add_inner_method(&mut self, outer: u32, inner: u32) {
        if outer == inner || !self.methods.contains_key(&inner) {
            return;
        }

        let Some(outer_info) = self.methods.get_mut(&outer) else {
            return;
        };
        if !outer_info.inner_methods.contains(&inner) {
            outer_info.inner_methods.push(inner);
        }
        let outer_id = outer_info.id;

        if let Some(inner_info) = self.methods.get_mut(&inner) {
            inner_info.outer_method.get_or_insert(outer_id);
        }
    }

    /// Point `offset` at its scanned [`MethodPcInfo`], registering it first if needed.
    pub fn set_pc_info_index(&mut self, offset: u32, pc_info_index: usize, record_name: &Arc<str>) {
        self.register(offset, record_name, Discovery::Enumerated);
        if let Some(info) = self.methods.get_mut(&offset) {
            info.pc_info_index = Some(pc_info_index);
        }
    }

    /// The entry of `offset`.
    #[must_use]
    pub fn get(&self, offset: u32) -> Option<&MethodInfo> {
        self.methods.get(&offset)
    }

    /// Returns `true` if `offset` is registered.
    #[must_use]
    pub fn contains(&self, offset: u32) -> bool {
        self.methods.contains_key(&offset)
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Entries ordered by method offset.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &MethodInfo)> {
        self.methods.iter().map(|(offset, info)| (*offset, info))
    }
}

/// Fast-call eligibility of a scanned method, paired with its no-GC flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FastCallInfo {
    /// The method can be dispatched through the fast-call convention
    pub can_fast_call: bool,
    /// No instruction of the method can trigger a garbage collection
    pub no_gc: bool,
}

/// Everything collected from one file.
#[derive(Debug, Default)]
pub struct BytecodeInfo {
    record_names: Vec<Arc<str>>,
    listed_records: HashSet<Arc<str>>,
    interned: HashSet<Arc<str>>,
    pc_infos: Vec<MethodPcInfo>,
    registry: MethodRegistry,
    class_defs: BTreeMap<u32, BTreeSet<usize>>,
    scanned: HashMap<u32, usize>,
    main_methods: HashMap<Arc<str>, u32>,
    fast_call: BTreeMap<u32, FastCallInfo>,
}

impl BytecodeInfo {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance of `name`, created on first use.
    pub fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(existing) = self.interned.get(name) {
            return Arc::clone(existing);
        }

        let name: Arc<str> = Arc::from(name);
        self.interned.insert(Arc::clone(&name));
        name
    }

    /// Distinct record names, in the order they were first pushed.
    #[must_use]
    pub fn record_names(&self) -> &[Arc<str>] {
        &self.record_names
    }

    pub(crate) fn push_record_name(&mut self, name: Arc<str>) {
        if self.listed_records.insert(Arc::clone(&name)) {
            self.record_names.push(name);
        }
    }

    /// All scanned bodies, addressed by pc-info index.
    #[must_use]
    pub fn pc_infos(&self) -> &[MethodPcInfo] {
        &self.pc_infos
    }

    /// The pc info at `index`.
    #[must_use]
    pub fn pc_info(&self, index: usize) -> Option<&MethodPcInfo> {
        self.pc_infos.get(index)
    }

    /// The pc info of a scanned method offset.
    #[must_use]
    pub fn method_pc_info(&self, offset: u32) -> Option<&MethodPcInfo> {
        self.scanned_pc_info(offset)
            .and_then(|index| self.pc_infos.get(index))
    }

    pub(crate) fn push_pc_info(&mut self, offset: u32, pc_info: MethodPcInfo) -> usize {
        self.pc_infos.push(pc_info);
        let index = self.pc_infos.len() - 1;
        self.scanned.insert(offset, index);
        index
    }

    /// Pc-info index of `offset` if its body was scanned in this session.
    #[must_use]
    pub fn scanned_pc_info(&self, offset: u32) -> Option<usize> {
        self.scanned.get(&offset).copied()
    }

    /// The method registry.
    #[must_use]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut MethodRegistry {
        &mut self.registry
    }

    /// Registry entry of a method offset.
    #[must_use]
    pub fn method_info(&self, offset: u32) -> Option<&MethodInfo> {
        self.registry.get(offset)
    }

    pub(crate) fn record_class_def(&mut self, method_offset: u32, bc_index: usize) {
        self.class_defs
            .entry(method_offset)
            .or_default()
            .insert(bc_index);
    }

    /// Returns `true` if instruction `bc_index` of the method is a class definition.
    #[must_use]
    pub fn is_class_def(&self, method_offset: u32, bc_index: usize) -> bool {
        self.class_defs
            .get(&method_offset)
            .is_some_and(|indexes| indexes.contains(&bc_index))
    }

    /// Class-definition instruction indices of one method.
    #[must_use]
    pub fn class_def_indexes(&self, method_offset: u32) -> Option<&BTreeSet<usize>> {
        self.class_defs.get(&method_offset)
    }

    /// Class-definition instruction indices of all methods, merged.
    #[must_use]
    pub fn class_def_bc_indexes(&self) -> BTreeSet<usize> {
        self.class_defs.values().flatten().copied().collect()
    }

    pub(crate) fn set_main_method(&mut self, record: Arc<str>, offset: u32) {
        self.main_methods.insert(record, offset);
    }

    /// Offset of the entry (or latest patch) method of a record.
    #[must_use]
    pub fn main_method(&self, record: &str) -> Option<u32> {
        self.main_methods.get(record).copied()
    }

    pub(crate) fn set_fast_call(&mut self, offset: u32, info: FastCallInfo) {
        self.fast_call.insert(offset, info);
    }

    /// Fast-call information of a scanned method offset.
    #[must_use]
    pub fn fast_call_info(&self, offset: u32) -> Option<FastCallInfo> {
        self.fast_call.get(&offset).copied()
    }

    /// Fast-call information of all scanned methods, ordered by offset.
    pub fn fast_call_infos(&self) -> impl Iterator<Item = (u32, FastCallInfo)> + '_ {
        self.fast_call.iter().map(|(offset, info)| (*offset, *info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        let record: Arc<str> = Arc::from("app");
        let mut registry = MethodRegistry::new();

        let first = registry.register(0x40, &record, Discovery::DefineFunction);
        let again = registry.register(0x40, &record, Discovery::Enumerated);
        let other = registry.register(0x50, &record, Discovery::Enumerated);

        assert_eq!(first, again);
        assert_eq!(first, 0);
        assert_eq!(other, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0x40).unwrap().discovery(), Discovery::DefineFunction);
    }

    #[test]
    fn pc_info_index_updates_in_place() {
        let record: Arc<str> = Arc::from("app");
        let mut registry = MethodRegistry::new();

        registry.register(0x40, &record, Discovery::LiteralBuffer);
        assert!(!registry.get(0x40).unwrap().is_scanned());
        assert_eq!(registry.get(0x40).unwrap().pc_info_index(), 0);

        registry.set_pc_info_index(0x40, 3, &record);
        let info = registry.get(0x40).unwrap();
        assert_eq!(info.id(), 0);
        assert_eq!(info.pc_info_index(), 3);
        assert!(info.is_scanned());

        registry.set_pc_info_index(0x80, 4, &record);
        assert_eq!(registry.get(0x80).unwrap().id(), 1);
        assert_eq!(registry.get(0x80).unwrap().discovery(), Discovery::Enumerated);
    }

    #[test]
    fn inner_methods() {
        let record: Arc<str> = Arc::from("app");
        let mut registry = MethodRegistry::new();
        registry.register(0x40, &record, Discovery::Enumerated);
        registry.register(0x50, &record, Discovery::DefineFunction);

        registry.add_inner_method(0x40, 0x50);
        registry.add_inner_method(0x40, 0x50);
        registry.add_inner_method(0x40, 0x40);
        registry.add_inner_method(0x40, 0x60);

        assert_eq!(registry.get(0x40).unwrap().inner_methods(), &[0x50]);
        assert_eq!(registry.get(0x50).unwrap().outer_method(), Some(0));
        assert_eq!(registry.get(0x40).unwrap().outer_method(), None);
    }

    #[test]
    fn interning_shares_names() {
        let mut info = BytecodeInfo::new();
        let first = info.intern("com/demo/Main");
        let second = info.intern("com/demo/Main");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &info.intern("com/demo/Other")));
    }

    #[test]
    fn record_names_are_distinct() {
        let mut info = BytecodeInfo::new();
        for name in ["com/demo/Main", "com/demo/Other", "com/demo/Main"] {
            let record = info.intern(name);
            info.push_record_name(record);
        }

        let names: Vec<&str> = info.record_names().iter().map(|name| &**name).collect();
        assert_eq!(names, vec!["com/demo/Main", "com/demo/Other"]);
    }

    #[test]
    fn class_definitions_per_method() {
        let mut info = BytecodeInfo::new();
        info.record_class_def(0x40, 2);
        info.record_class_def(0x50, 2);
        info.record_class_def(0x50, 7);

        assert!(info.is_class_def(0x40, 2));
        assert!(!info.is_class_def(0x40, 7));
        assert_eq!(info.class_def_indexes(0x50).unwrap().len(), 2);
        assert_eq!(
            info.class_def_bc_indexes().into_iter().collect::<Vec<_>>(),
            vec![2, 7]
        );
    }

    #[test]
    fn scanned_bodies() {
        let mut info = BytecodeInfo::new();
        let mut pc_info = MethodPcInfo::new(4);
        pc_info.push(0);
        pc_info.push(3);

        assert_eq!(info.scanned_pc_info(0x40), None);
        let index = info.push_pc_info(0x40, pc_info);
        assert_eq!(index, 0);
        assert_eq!(info.scanned_pc_info(0x40), Some(0));
        assert_eq!(info.method_pc_info(0x40).unwrap().pc_offsets(), &[0, 3]);
        assert_eq!(info.pc_info(0).unwrap().method_size(), 4);
    }
}
