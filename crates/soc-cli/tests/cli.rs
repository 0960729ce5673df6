use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../soc-core/tests/fixtures")
        .join(name)
}

fn run(args: &[&str], cwd: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_small-openapi-codegen"))
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn validate_accepts_sample() {
    let dir = tempfile::tempdir().unwrap();
    let spec = fixture("sample-serv.yaml");
    let output = run(&["validate", spec.to_str().unwrap()], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("is valid."));
}

#[test]
fn validate_reports_each_problem() {
    let dir = tempfile::tempdir().unwrap();
    let spec = fixture("validation-test-cases.yaml");
    let output = run(&["validate", spec.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.starts_with("OpenAPI specification validation failed:\n"));
    let lines: Vec<_> = err.lines().filter(|l| l.starts_with("- ")).collect();
    assert_eq!(lines.len(), 11);
    assert!(lines.iter().all(|l| l.contains("Property with key name '")));
}

#[test]
fn generate_writes_client() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("client");
    let spec = fixture("sample-serv.yaml");
    let output = run(
        &[
            "generate",
            spec.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--namespace",
            "@acme",
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let package = std::fs::read_to_string(out.join("package.json")).unwrap();
    assert!(package.contains("\"name\": \"@acme/sample-serv-client\""));
    let index = std::fs::read_to_string(out.join("src/index.ts")).unwrap();
    assert!(index.contains("export class SampleServClient {"));
    assert!(out.join("tsconfig.json").exists());
}

#[test]
fn generate_refuses_invalid_spec() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("client");
    let spec = fixture("invalid-schema.yaml");
    let output = run(
        &["generate", spec.to_str().unwrap(), "-o", out.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("OpenAPI specification validation failed:"));
    assert!(!out.exists());
}

#[test]
fn generate_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let spec = fixture("sample-serv.yaml");
    std::fs::write(
        dir.path().join(".small-openapi-codegen.yaml"),
        format!(
            "input: {}\noutput: out\noptions:\n  name: pets\n  className: PetStore\n",
            spec.display()
        ),
    )
    .unwrap();

    let output = run(&["generate", "--class-name", "PetsApi"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));

    let package = std::fs::read_to_string(dir.path().join("out/package.json")).unwrap();
    assert!(package.contains("\"name\": \"pets\""));
    let index = std::fs::read_to_string(dir.path().join("out/src/index.ts")).unwrap();
    assert!(index.contains("export class PetsApi {"));
}

#[test]
fn init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["init"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join(".small-openapi-codegen.yaml").exists());

    let again = run(&["init"], dir.path());
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));

    let forced = run(&["init", "--force"], dir.path());
    assert!(forced.status.success());
}
