// crates/tessera-renter/src/registry.rs
//
// FileRegistry: the renter's name-indexed set of uploaded files.
//
// All file state lives behind one reader/writer lock. Queries take the shared
// lock; mutations take the exclusive lock, check preconditions, mutate, and
// then checkpoint the full file set through the injected `Persister` before
// releasing it. Everything handed back to callers is a copy.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tessera_core::error::TesseraError;
use tessera_core::file::{ContractId, File, FilePiece};
use tessera_core::host::BlockHeight;
use tessera_core::traits::Persister;

use crate::availability;

/// Point-in-time summary of one file, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub available: bool,
    pub repairing: bool,
    pub time_remaining: BlockHeight,
    pub active_pieces: usize,
    pub pieces_required: usize,
    pub total_pieces: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    files: BTreeMap<String, File>,
    block_height: BlockHeight,
}

impl RegistryState {
    fn file(&self, name: &str) -> Result<&File, TesseraError> {
        self.files
            .get(name)
            .ok_or_else(|| TesseraError::NotFound(format!("No file named {}", name)))
    }

    fn file_mut(&mut self, name: &str) -> Result<&mut File, TesseraError> {
        self.files
            .get_mut(name)
            .ok_or_else(|| TesseraError::NotFound(format!("No file named {}", name)))
    }

    fn info(&self, file: &File) -> FileInfo {
        FileInfo {
            name: file.name.clone(),
            available: availability::available(file),
            repairing: availability::repairing(file),
            time_remaining: availability::time_remaining(file, self.block_height),
            active_pieces: file.active_pieces(),
            pieces_required: file.pieces_required,
            total_pieces: file.total_pieces,
        }
    }
}

/// The renter's files, keyed by name.
pub struct FileRegistry {
    state: RwLock<RegistryState>,
    persister: Arc<dyn Persister>,
}

impl FileRegistry {
    /// Create an empty registry at height 0.
    pub fn new(persister: Arc<dyn Persister>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            persister,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, TesseraError> {
        self.state
            .read()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, TesseraError> {
        self.state
            .write()
            .map_err(|e| TesseraError::Lock(format!("RwLock poisoned: {}", e)))
    }

    /// Save a snapshot of every file. Runs with the write lock held.
    fn checkpoint(&self, state: &RegistryState) -> Result<(), TesseraError> {
        let snapshot: Vec<File> = state.files.values().cloned().collect();
        self.persister.save(&snapshot).map_err(|e| {
            warn!("Failed to checkpoint {} files: {}", snapshot.len(), e);
            match e {
                TesseraError::Storage(_) => e,
                other => TesseraError::Storage(other.to_string()),
            }
        })
    }

    pub fn block_height(&self) -> BlockHeight {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .block_height
    }

    /// Record a new consensus height, used by expiry queries.
    pub fn set_block_height(&self, height: BlockHeight) -> Result<(), TesseraError> {
        self.write()?.block_height = height;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .files
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a newly uploaded file.
    ///
    /// # Errors
    /// Returns `TesseraError::AlreadyExists` if a file of that name is tracked.
    pub fn add_file(&self, file: File) -> Result<(), TesseraError> {
        let mut state = self.write()?;
        if state.files.contains_key(&file.name) {
            return Err(TesseraError::AlreadyExists(format!(
                "File {} already exists",
                file.name
            )));
        }
        info!("Tracking file {} ({} of {} pieces required)", file.name, file.pieces_required, file.total_pieces);
        state.files.insert(file.name.clone(), file);
        self.checkpoint(&state)
    }

    /// Stop tracking a file and return it.
    pub fn remove_file(&self, name: &str) -> Result<File, TesseraError> {
        let mut state = self.write()?;
        let file = state
            .files
            .remove(name)
            .ok_or_else(|| TesseraError::NotFound(format!("No file named {}", name)))?;
        info!("Removed file {}", name);
        self.checkpoint(&state)?;
        Ok(file)
    }

    /// Append a piece uploaded under a new contract.
    pub fn add_piece(&self, name: &str, piece: FilePiece) -> Result<(), TesseraError> {
        let mut state = self.write()?;
        state.file_mut(name)?.add_piece(piece)?;
        self.checkpoint(&state)
    }

    /// Mark the piece held under `contract_id` as reachable or not.
    pub fn set_piece_active(
        &self,
        name: &str,
        contract_id: &ContractId,
        active: bool,
    ) -> Result<(), TesseraError> {
        self.update_piece(name, contract_id, |piece| piece.active = active)
    }

    /// Mark the piece held under `contract_id` as being re-uploaded or not.
    pub fn set_piece_repairing(
        &self,
        name: &str,
        contract_id: &ContractId,
        repairing: bool,
    ) -> Result<(), TesseraError> {
        self.update_piece(name, contract_id, |piece| piece.repairing = repairing)
    }

    fn update_piece<F>(&self, name: &str, contract_id: &ContractId, f: F) -> Result<(), TesseraError>
    where
        F: FnOnce(&mut FilePiece),
    {
        let mut state = self.write()?;
        let piece = state.file_mut(name)?.piece_mut(contract_id).ok_or_else(|| {
            TesseraError::NotFound(format!("No piece of {} under contract {}", name, contract_id))
        })?;
        f(piece);
        self.checkpoint(&state)
    }

    /// Whether the named file can currently be reconstructed.
    pub fn available(&self, name: &str) -> Result<bool, TesseraError> {
        let state = self.read()?;
        Ok(availability::available(state.file(name)?))
    }

    /// Whether the named file is being repaired.
    pub fn repairing(&self, name: &str) -> Result<bool, TesseraError> {
        let state = self.read()?;
        Ok(availability::repairing(state.file(name)?))
    }

    /// Blocks until the named file's contracts expire at the current height.
    pub fn time_remaining(&self, name: &str) -> Result<BlockHeight, TesseraError> {
        let state = self.read()?;
        Ok(availability::time_remaining(state.file(name)?, state.block_height))
    }

    /// A copy of the named file.
    pub fn file(&self, name: &str) -> Result<File, TesseraError> {
        let state = self.read()?;
        state.file(name).cloned()
    }

    /// Summaries of every file, ordered by name.
    pub fn file_list(&self) -> Result<Vec<FileInfo>, TesseraError> {
        let state = self.read()?;
        Ok(state.files.values().map(|f| state.info(f)).collect())
    }

    /// Rename a file. The original must exist and the new name must be free.
    ///
    /// # Errors
    /// Returns `TesseraError::NotFound` if `current` is not tracked and
    /// `TesseraError::AlreadyExists` if `new` is taken; nothing is changed or
    /// persisted in either case.
    pub fn rename(&self, current: &str, new: &str) -> Result<(), TesseraError> {
        let mut state = self.write()?;
        if !state.files.contains_key(current) {
            return Err(TesseraError::NotFound("no file found by that name".to_string()));
        }
        if state.files.contains_key(new) {
            return Err(TesseraError::AlreadyExists(
                "file of new name already exists".to_string(),
            ));
        }

        if let Some(mut file) = state.files.remove(current) {
            file.name = new.to_string();
            state.files.insert(new.to_string(), file);
        }
        info!("Renamed file {} -> {}", current, new);
        self.checkpoint(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tessera_core::crypto::Hash;
    use tessera_core::file::{FileContract, NetAddress};
    use tessera_core::traits::NullPersister;

    /// Persister remembering the file names of every checkpoint.
    #[derive(Default)]
    struct RecordingPersister {
        saves: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingPersister {
        fn saves(&self) -> Vec<Vec<String>> {
            self.saves.lock().unwrap().clone()
        }
    }

    impl Persister for RecordingPersister {
        fn save(&self, files: &[File]) -> Result<(), TesseraError> {
            let names = files.iter().map(|f| f.name.clone()).collect();
            self.saves.lock().unwrap().push(names);
            Ok(())
        }
    }

    struct FailingPersister;

    impl Persister for FailingPersister {
        fn save(&self, _files: &[File]) -> Result<(), TesseraError> {
            Err(TesseraError::Storage("disk full".to_string()))
        }
    }

    fn contract(id: u8) -> ContractId {
        ContractId([id; 32])
    }

    fn make_piece(id: u8, piece_index: usize, window_start: BlockHeight) -> FilePiece {
        FilePiece {
            active: true,
            repairing: false,
            contract: FileContract {
                file_size: 1 << 22,
                window_start,
                window_end: window_start + 144,
                revision_number: 1,
            },
            contract_id: contract(id),
            host_address: NetAddress(format!("host{}.example:9982", id)),
            start_index: 0,
            end_index: 1 << 22,
            piece_index,
            checksum: Hash::default(),
        }
    }

    fn make_file(name: &str, pieces: usize) -> File {
        let mut file = File::new(name, "reed-solomon", 2, 3, 4).unwrap();
        for i in 0..pieces {
            file.add_piece(make_piece(i as u8, i, 2000)).unwrap();
        }
        file
    }

    fn registry() -> (Arc<RecordingPersister>, FileRegistry) {
        let persister = Arc::new(RecordingPersister::default());
        (persister.clone(), FileRegistry::new(persister))
    }

    #[test]
    fn test_add_file_and_queries() {
        let (_, reg) = registry();
        reg.add_file(make_file("a.txt", 3)).unwrap();
        reg.set_block_height(1800).unwrap();

        assert!(reg.available("a.txt").unwrap());
        assert!(!reg.repairing("a.txt").unwrap());
        assert_eq!(reg.time_remaining("a.txt").unwrap(), 200);
        assert_eq!(reg.block_height(), 1800);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_queries_on_missing_file() {
        let (_, reg) = registry();
        assert!(matches!(reg.available("nope"), Err(TesseraError::NotFound(_))));
        assert!(matches!(reg.repairing("nope"), Err(TesseraError::NotFound(_))));
        assert!(matches!(reg.time_remaining("nope"), Err(TesseraError::NotFound(_))));
        assert!(matches!(reg.file("nope"), Err(TesseraError::NotFound(_))));
    }

    #[test]
    fn test_add_duplicate_file() {
        let (persister, reg) = registry();
        reg.add_file(make_file("a.txt", 0)).unwrap();
        let err = reg.add_file(make_file("a.txt", 2)).unwrap_err();
        assert!(matches!(err, TesseraError::AlreadyExists(_)));
        assert_eq!(reg.file("a.txt").unwrap().pieces.len(), 0);
        assert_eq!(persister.saves().len(), 1);
    }

    #[test]
    fn test_piece_state_transitions() {
        let (_, reg) = registry();
        reg.add_file(make_file("a.txt", 2)).unwrap();
        assert!(reg.available("a.txt").unwrap());

        // Host loss detected, replacement upload under way.
        reg.set_piece_active("a.txt", &contract(1), false).unwrap();
        reg.set_piece_repairing("a.txt", &contract(1), true).unwrap();
        assert!(!reg.available("a.txt").unwrap());
        assert!(reg.repairing("a.txt").unwrap());

        // Replacement finished.
        reg.set_piece_repairing("a.txt", &contract(1), false).unwrap();
        reg.set_piece_active("a.txt", &contract(1), true).unwrap();
        assert!(reg.available("a.txt").unwrap());
        assert!(!reg.repairing("a.txt").unwrap());
    }

    #[test]
    fn test_update_unknown_piece() {
        let (_, reg) = registry();
        reg.add_file(make_file("a.txt", 1)).unwrap();
        let err = reg.set_piece_active("a.txt", &contract(7), false).unwrap_err();
        assert!(matches!(err, TesseraError::NotFound(_)));
    }

    #[test]
    fn test_add_piece() {
        let (_, reg) = registry();
        reg.add_file(make_file("a.txt", 1)).unwrap();
        assert!(!reg.available("a.txt").unwrap());

        reg.add_piece("a.txt", make_piece(1, 1, 2000)).unwrap();
        assert!(reg.available("a.txt").unwrap());

        let err = reg.add_piece("a.txt", make_piece(9, 4, 2000)).unwrap_err();
        assert!(matches!(err, TesseraError::InvalidState(_)));
        assert_eq!(reg.file("a.txt").unwrap().pieces.len(), 2);
    }

    #[test]
    fn test_remove_file() {
        let (_, reg) = registry();
        reg.add_file(make_file("a.txt", 1)).unwrap();
        let removed = reg.remove_file("a.txt").unwrap();
        assert_eq!(removed.name, "a.txt");
        assert!(reg.is_empty());
        assert!(matches!(reg.remove_file("a.txt"), Err(TesseraError::NotFound(_))));
    }

    #[test]
    fn test_rename() {
        let (persister, reg) = registry();
        reg.add_file(make_file("old.txt", 1)).unwrap();
        reg.rename("old.txt", "new.txt").unwrap();

        assert!(matches!(reg.file("old.txt"), Err(TesseraError::NotFound(_))));
        assert_eq!(reg.file("new.txt").unwrap().name, "new.txt");
        assert_eq!(persister.saves().last().unwrap(), &vec!["new.txt".to_string()]);
    }

    #[test]
    fn test_rename_missing_source_changes_nothing() {
        let (persister, reg) = registry();
        reg.add_file(make_file("a.txt", 1)).unwrap();
        let before = reg.file_list().unwrap();

        let err = reg.rename("missing.txt", "b.txt").unwrap_err();
        assert!(matches!(err, TesseraError::NotFound(_)));
        assert_eq!(reg.file_list().unwrap(), before);
        assert_eq!(persister.saves().len(), 1);
    }

    #[test]
    fn test_rename_onto_existing_changes_nothing() {
        let (persister, reg) = registry();
        reg.add_file(make_file("a.txt", 1)).unwrap();
        reg.add_file(make_file("b.txt", 3)).unwrap();
        let before = reg.file_list().unwrap();

        let err = reg.rename("a.txt", "b.txt").unwrap_err();
        assert!(matches!(err, TesseraError::AlreadyExists(_)));
        assert_eq!(reg.file_list().unwrap(), before);
        assert_eq!(reg.file("b.txt").unwrap().pieces.len(), 3);
        assert_eq!(persister.saves().len(), 2);
    }

    #[test]
    fn test_file_list_is_sorted_snapshot() {
        let reg = FileRegistry::new(Arc::new(NullPersister));
        reg.add_file(make_file("zeta", 3)).unwrap();
        reg.add_file(make_file("alpha", 1)).unwrap();
        reg.set_block_height(2500).unwrap();

        let list = reg.file_list().unwrap();
        let names: Vec<&str> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(!list[0].available);
        assert!(list[1].available);
        assert_eq!(list[1].time_remaining, 0);
        assert_eq!(list[1].active_pieces, 3);

        // Later mutations do not show through an earlier snapshot.
        reg.set_piece_active("zeta", &contract(0), false).unwrap();
        assert_eq!(list[1].active_pieces, 3);
    }

    #[test]
    fn test_file_copy_is_detached() {
        let reg = FileRegistry::new(Arc::new(NullPersister));
        reg.add_file(make_file("a.txt", 2)).unwrap();

        let mut copy = reg.file("a.txt").unwrap();
        copy.pieces[0].active = false;
        copy.pieces[1].active = false;
        assert!(reg.available("a.txt").unwrap());
    }

    #[test]
    fn test_checkpoint_failure_is_surfaced() {
        let reg = FileRegistry::new(Arc::new(FailingPersister));
        let err = reg.add_file(make_file("a.txt", 0)).unwrap_err();
        assert!(matches!(err, TesseraError::Storage(_)));
    }
}
