use labsim_core::{
    models::{LabDefinition, Step, ValidationRule},
    ProgressStore, ProgressStoreBuilder,
};
use tempfile::TempDir;

/// Helper function to create a progress store in a temporary directory
#[allow(dead_code)]
pub async fn create_test_store() -> (TempDir, ProgressStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("progress.db");
    let store = ProgressStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create progress store");
    (temp_dir, store)
}

/// Three validatable steps: `pwd`, `whoami`, `chmod u+x backup.sh`
#[allow(dead_code)]
pub fn three_step_lab() -> LabDefinition {
    LabDefinition::new(
        "test-lab",
        "Test Lab",
        vec![
            Step::new("where", "Where am I?").with_rule(ValidationRule::command("^pwd$")),
            Step::new("who", "Who am I?").with_rule(ValidationRule::command("whoami")),
            Step::new("perm", "Make it executable")
                .with_rule(ValidationRule::command(r"chmod.*u\+x.*backup\.sh")),
        ],
    )
}
