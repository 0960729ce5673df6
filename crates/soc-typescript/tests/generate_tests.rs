use std::path::{Path, PathBuf};

use soc_core::options::{GenerationOptions, resolve_options};
use soc_core::resolve::dereference;
use soc_core::{ApiModel, GeneratedFile, generate, parse, read_spec};
use soc_typescript::TypeScriptModel;

fn sample_serv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../soc-core/tests/fixtures/sample-serv.yaml")
}

async fn render(options: GenerationOptions) -> Vec<GeneratedFile> {
    let model = read_spec(&sample_serv(), &options).await.unwrap();
    generate(&TypeScriptModel, model).unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("{path} not generated"))
        .content
}

#[tokio::test]
async fn emits_package_source_and_tsconfig() {
    let files = render(GenerationOptions::default()).await;
    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    insta::assert_snapshot!(paths.join(" "), @"package.json src/index.ts tsconfig.json");
}

#[tokio::test]
async fn package_json_uses_resolved_name() {
    let files = render(GenerationOptions::default()).await;
    let package: serde_json::Value = serde_json::from_str(file(&files, "package.json")).unwrap();
    assert_eq!(package["name"], "sample-serv-client");
    assert_eq!(package["version"], "1.0.0");
    assert_eq!(
        package["description"],
        "A small pet service used to exercise the generator."
    );

    let tsconfig: serde_json::Value = serde_json::from_str(file(&files, "tsconfig.json")).unwrap();
    assert_eq!(tsconfig["compilerOptions"]["strict"], true);
}

#[tokio::test]
async fn namespace_prefixes_package_name() {
    let options = GenerationOptions {
        namespace: Some("@acme".to_string()),
        ..Default::default()
    };
    let files = render(options).await;
    let package: serde_json::Value = serde_json::from_str(file(&files, "package.json")).unwrap();
    assert_eq!(package["name"], "@acme/sample-serv-client");
}

#[tokio::test]
async fn client_class_and_schema_types() {
    let files = render(GenerationOptions::default()).await;
    let index = file(&files, "src/index.ts");

    assert!(index.contains("export class SampleServClient {"));
    assert!(index.contains("this.baseUrl = options.baseUrl ?? \"https://api.example.com\";"));

    assert!(index.contains("export interface Pet {"));
    assert!(index.contains("  id: number;"));
    assert!(index.contains("  tag?: string;"));
    assert!(index.contains("  status?: \"available\" | \"pending\" | \"sold\";"));
    assert!(index.contains("  category?: Category;"));
    assert!(index.contains("export interface Category {"));
    // The self-reference stays a name where the cycle closes.
    assert!(index.contains("  parent?: Category;"));
    assert!(index.contains("export type Pets = Pet[];"));
}

#[tokio::test]
async fn one_method_per_operation() {
    let files = render(GenerationOptions::default()).await;
    let index = file(&files, "src/index.ts");

    for name in [
        "listPets",
        "createPet",
        "showPetById",
        "deleteV1PetsPetId",
        "uploadPhoto",
        "login",
    ] {
        assert!(index.contains(&format!("  async {name}(")), "missing {name}");
    }

    assert!(index.contains("    params: { limit?: number; } = {},"));
    assert!(index.contains("    query[\"limit\"] = params.limit;"));
    // Dereferenced bodies that match a component are printed by name.
    assert!(index.contains("    body: Pet,"));
    assert!(index.contains("  ): Promise<Pet[]> {"));
    assert!(index.contains("   * Responses: 200, default"));
    assert!(index.contains(
        "this.request<void>(\"DELETE\", `/v1/pets/${encodeURIComponent(String(params.petId))}`"
    ));
}

#[tokio::test]
async fn form_bodies() {
    let files = render(GenerationOptions::default()).await;
    let index = file(&files, "src/index.ts");

    assert!(index.contains("    body: { photo: Blob; extras?: Blob[]; caption?: string },"));
    assert!(index.contains("    const payload = new FormData();"));
    assert!(index.contains("for (const file of body?.extras ?? []) payload.append(\"extras\", file);"));
    assert!(index.contains("payload.append(\"photo\", body.photo);"));

    assert!(index.contains("    body?: { username: string; password: string },"));
    assert!(index.contains("    const payload = new URLSearchParams();"));
    assert!(index.contains("payload.append(\"username\", String(body.username));"));
}

#[tokio::test]
async fn snake_case_identifiers() {
    let options = GenerationOptions {
        snake: true,
        ..Default::default()
    };
    let files = render(options).await;
    let index = file(&files, "src/index.ts");

    assert!(index.contains("  async list_pets("));
    assert!(index.contains("  async show_pet_by_id("));
    assert!(index.contains("    params: { pet_id: string; },"));
    assert!(index.contains("${encodeURIComponent(String(params.pet_id))}"));
}

#[test]
fn document_without_components_or_servers() {
    let spec = parse::from_yaml(
        r#"
openapi: 3.1.0
info: { title: Ping, version: "0.1.0" }
paths:
  /ping:
    get:
      operationId: ping
      responses:
        "204": { description: pong }
"#,
    )
    .unwrap();
    let options = resolve_options(Path::new("ping.yaml"), &GenerationOptions::default());
    let files = generate(&TypeScriptModel, ApiModel::new(spec, options)).unwrap();
    let index = file(&files, "src/index.ts");

    assert!(index.contains("export class PingClient {"));
    assert!(index.contains("this.baseUrl = options.baseUrl ?? \"\";"));
    assert!(index.contains("  async ping(\n    options: RequestOptions = {},\n  ): Promise<void> {"));
    assert!(index.contains("this.request<void>(\"GET\", `/ping`, query, payload, headers, options);"));
    // No component types precede the client's own interfaces.
    assert_eq!(
        index.find("export interface"),
        index.find("export interface RequestOptions")
    );
    assert!(!index.contains("export type"));
}

#[test]
fn recursive_schema_refers_to_itself() {
    let spec = parse::from_yaml(
        r#"
openapi: 3.0.3
info: { title: Tree, version: "1" }
paths:
  /root:
    get:
      operationId: getRoot
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Node'
components:
  schemas:
    Node:
      type: object
      properties:
        name:
          type: string
        children:
          type: array
          items:
            $ref: '#/components/schemas/Node'
"#,
    )
    .unwrap();
    let spec = dereference(&spec).unwrap();
    let options = resolve_options(Path::new("tree.yaml"), &GenerationOptions::default());
    let files = generate(&TypeScriptModel, ApiModel::new(spec, options)).unwrap();
    let index = file(&files, "src/index.ts");

    assert!(index.contains("export interface Node {"));
    assert!(index.contains("  children?: Node[];"));
    assert!(index.contains("  ): Promise<Node> {"));
}

#[test]
fn same_name_parameters_in_different_locations() {
    let spec = parse::from_yaml(
        r#"
openapi: 3.0.3
info: { title: Paging, version: "1" }
paths:
  /items/{limit}:
    get:
      operationId: listItems
      parameters:
        - { name: limit, in: path, required: true, schema: { type: integer } }
        - { name: limit, in: query, schema: { type: integer } }
        - { name: limit, in: header, schema: { type: string } }
      responses:
        "204": { description: done }
"#,
    )
    .unwrap();
    let options = resolve_options(Path::new("paging.yaml"), &GenerationOptions::default());
    let files = generate(&TypeScriptModel, ApiModel::new(spec, options)).unwrap();
    let index = file(&files, "src/index.ts");

    assert!(index.contains(
        "    params: { limitPath: number; limitQuery?: number; limitHeader?: string; },"
    ));
    assert!(index.contains("    query[\"limit\"] = params.limitQuery;"));
    assert!(index.contains(
        "if (params.limitHeader !== undefined) headers[\"limit\"] = String(params.limitHeader);"
    ));
    assert!(index.contains("`/items/${encodeURIComponent(String(params.limitPath))}`"));
}
