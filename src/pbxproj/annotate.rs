//! Reference annotations (`ID /* comment */`) for the ASCII writer.
//!
//! Xcode decorates every object identifier it writes with a short comment
//! naming the object. The comments are derived purely from the object graph,
//! so they are recomputed on every write and never stored.

use std::collections::HashMap;

use plist::{Dictionary, Value};

/// Comments for every object identifier that gets one.
#[derive(Debug, Default)]
pub struct Annotations {
    comments: HashMap<String, String>,
}

impl Annotations {
    /// Compute annotations for the `objects` dictionary of a project.
    ///
    /// `project_name` is used for the project's own configuration list, since
    /// the name is not stored inside the document.
    pub fn new(objects: &Dictionary, project_name: Option<&str>) -> Self {
        let mut list_owners: HashMap<&str, String> = HashMap::new();
        let mut build_file_phases: HashMap<&str, String> = HashMap::new();

        for (id, object) in objects.iter() {
            let Some(object) = object.as_dictionary() else {
                continue;
            };
            let isa = string_field(object, "isa").unwrap_or_default();

            if let Some(list) = string_field(object, "buildConfigurationList") {
                let owner = if isa == "PBXProject" {
                    project_name.unwrap_or("Project").to_string()
                } else {
                    string_field(object, "name").unwrap_or(id.as_str()).to_string()
                };
                list_owners.insert(list, format!("{} \"{}\"", isa, owner));
            }

            if isa.ends_with("BuildPhase") {
                let phase = phase_name(object, isa);
                for file in object
                    .get("files")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_string)
                {
                    build_file_phases.insert(file, phase.clone());
                }
            }
        }

        let mut comments = HashMap::new();
        for (id, object) in objects.iter() {
            let Some(object) = object.as_dictionary() else {
                continue;
            };
            let isa = string_field(object, "isa").unwrap_or_default();

            let comment = match isa {
                "PBXProject" => Some("Project object".to_string()),
                "XCConfigurationList" => list_owners
                    .get(id.as_str())
                    .map(|owner| format!("Build configuration list for {}", owner)),
                "PBXBuildFile" => {
                    let file = string_field(object, "fileRef")
                        .or_else(|| string_field(object, "productRef"))
                        .and_then(|r| objects.get(r))
                        .and_then(Value::as_dictionary)
                        .and_then(display_name);
                    let phase = build_file_phases.get(id.as_str());
                    match (file, phase) {
                        (Some(file), Some(phase)) => Some(format!("{} in {}", file, phase)),
                        (Some(file), None) => Some(file),
                        _ => None,
                    }
                }
                "PBXContainerItemProxy" | "PBXTargetDependency" => Some(isa.to_string()),
                "XCRemoteSwiftPackageReference" => string_field(object, "repositoryURL").map(|url| {
                    let repo = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
                    format!("{} \"{}\"", isa, repo.trim_end_matches(".git"))
                }),
                "XCLocalSwiftPackageReference" => string_field(object, "relativePath")
                    .map(|path| format!("{} \"{}\"", isa, path)),
                _ if isa.ends_with("BuildPhase") => Some(phase_name(object, isa)),
                _ => display_name(object),
            };

            if let Some(comment) = comment {
                comments.insert(id.clone(), comment.replace("*/", "(*)/"));
            }
        }

        Annotations { comments }
    }

    /// The comment for an object identifier, if it has one.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.comments.get(id).map(String::as_str)
    }
}

fn string_field<'a>(object: &'a Dictionary, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_string)
}

fn display_name(object: &Dictionary) -> Option<String> {
    string_field(object, "name")
        .or_else(|| string_field(object, "path"))
        .or_else(|| string_field(object, "productName"))
        .map(str::to_string)
}

fn phase_name(object: &Dictionary, isa: &str) -> String {
    if let Some(name) = string_field(object, "name") {
        return name.to_string();
    }
    match isa {
        "PBXSourcesBuildPhase" => "Sources",
        "PBXFrameworksBuildPhase" => "Frameworks",
        "PBXResourcesBuildPhase" => "Resources",
        "PBXHeadersBuildPhase" => "Headers",
        "PBXCopyFilesBuildPhase" => "CopyFiles",
        "PBXShellScriptBuildPhase" => "ShellScript",
        "PBXRezBuildPhase" => "Rez",
        _ => isa.trim_start_matches("PBX").trim_end_matches("BuildPhase"),
    }
    .to_string()
}
