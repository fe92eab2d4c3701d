//! Test fixtures for common test scenarios.
//!
//! Project documents are written in Xcode's canonical layout so that
//! writer tests can compare output byte for byte.

use std::path::{Path, PathBuf};

use crate::core::project::Project;

/// Identifiers used by [`projects::APP`].
pub mod ids {
    pub const APP_TARGET: &str = "1D0A00000000000000000020";
    pub const TESTS_TARGET: &str = "1D0A00000000000000000021";
    pub const ROOT_OBJECT: &str = "1D0A00000000000000000050";
    pub const APP_DEBUG: &str = "1D0A00000000000000000060";
    pub const APP_RELEASE: &str = "1D0A00000000000000000061";
    pub const TESTS_DEBUG: &str = "1D0A00000000000000000062";
    pub const TESTS_RELEASE: &str = "1D0A00000000000000000063";
}

/// Canned `project.pbxproj` documents.
pub mod projects {
    /// Two targets, `App` and `AppTests`, each with `Debug` and `Release`.
    ///
    /// `App`'s `Release` configuration has empty build settings; its `Debug`
    /// configuration already carries signing settings. Only `App` has a
    /// `TargetAttributes` entry.
    pub const APP: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 56;
	objects = {

/* Begin PBXBuildFile section */
		1D0A00000000000000000001 /* AppDelegate.swift in Sources */ = {isa = PBXBuildFile; fileRef = 1D0A00000000000000000002 /* AppDelegate.swift */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
		1D0A00000000000000000002 /* AppDelegate.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = AppDelegate.swift; sourceTree = "<group>"; };
		1D0A00000000000000000003 /* App.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = App.app; sourceTree = BUILT_PRODUCTS_DIR; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
		1D0A00000000000000000010 = {
			isa = PBXGroup;
			children = (
				1D0A00000000000000000002 /* AppDelegate.swift */,
				1D0A00000000000000000011 /* Products */,
			);
			sourceTree = "<group>";
		};
		1D0A00000000000000000011 /* Products */ = {
			isa = PBXGroup;
			children = (
				1D0A00000000000000000003 /* App.app */,
			);
			name = Products;
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
		1D0A00000000000000000020 /* App */ = {
			isa = PBXNativeTarget;
			buildConfigurationList = 1D0A00000000000000000040 /* Build configuration list for PBXNativeTarget "App" */;
			buildPhases = (
				1D0A00000000000000000030 /* Sources */,
			);
			buildRules = (
			);
			dependencies = (
			);
			name = App;
			productName = App;
			productReference = 1D0A00000000000000000003 /* App.app */;
			productType = "com.apple.product-type.application";
		};
		1D0A00000000000000000021 /* AppTests */ = {
			isa = PBXNativeTarget;
			buildConfigurationList = 1D0A00000000000000000041 /* Build configuration list for PBXNativeTarget "AppTests" */;
			buildPhases = (
			);
			buildRules = (
			);
			dependencies = (
			);
			name = AppTests;
			productName = AppTests;
			productType = "com.apple.product-type.bundle.unit-test";
		};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
		1D0A00000000000000000050 /* Project object */ = {
			isa = PBXProject;
			attributes = {
				BuildIndependentTargetsInParallel = 1;
				LastSwiftUpdateCheck = 1500;
				LastUpgradeCheck = 1500;
				TargetAttributes = {
					1D0A00000000000000000020 = {
						CreatedOnToolsVersion = 15.0;
					};
				};
			};
			buildConfigurationList = 1D0A00000000000000000042 /* Build configuration list for PBXProject "App" */;
			compatibilityVersion = "Xcode 14.0";
			developmentRegion = en;
			hasScannedForEncodings = 0;
			knownRegions = (
				en,
				Base,
			);
			mainGroup = 1D0A00000000000000000010;
			productRefGroup = 1D0A00000000000000000011 /* Products */;
			projectDirPath = "";
			projectRoot = "";
			targets = (
				1D0A00000000000000000020 /* App */,
				1D0A00000000000000000021 /* AppTests */,
			);
		};
/* End PBXProject section */

/* Begin PBXSourcesBuildPhase section */
		1D0A00000000000000000030 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				1D0A00000000000000000001 /* AppDelegate.swift in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */

/* Begin XCBuildConfiguration section */
		1D0A00000000000000000060 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				"CODE_SIGN_IDENTITY[sdk=macosx*]" = "-";
				CODE_SIGN_STYLE = Automatic;
				DEVELOPMENT_TEAM = OLDTEAM123;
				PRODUCT_BUNDLE_IDENTIFIER = com.example.app;
				PRODUCT_NAME = "$(TARGET_NAME)";
				PROVISIONING_PROFILE = "11111111-2222-3333-4444-555555555555";
			};
			name = Debug;
		};
		1D0A00000000000000000061 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
			};
			name = Release;
		};
		1D0A00000000000000000062 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				PRODUCT_NAME = "$(TARGET_NAME)";
			};
			name = Debug;
		};
		1D0A00000000000000000063 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				PRODUCT_NAME = "$(TARGET_NAME)";
			};
			name = Release;
		};
		1D0A00000000000000000064 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				SDKROOT = iphoneos;
			};
			name = Debug;
		};
		1D0A00000000000000000065 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				SDKROOT = iphoneos;
				VALIDATE_PRODUCT = YES;
			};
			name = Release;
		};
/* End XCBuildConfiguration section */

/* Begin XCConfigurationList section */
		1D0A00000000000000000040 /* Build configuration list for PBXNativeTarget "App" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				1D0A00000000000000000060 /* Debug */,
				1D0A00000000000000000061 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
		1D0A00000000000000000041 /* Build configuration list for PBXNativeTarget "AppTests" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				1D0A00000000000000000062 /* Debug */,
				1D0A00000000000000000063 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
		1D0A00000000000000000042 /* Build configuration list for PBXProject "App" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				1D0A00000000000000000064 /* Debug */,
				1D0A00000000000000000065 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
/* End XCConfigurationList section */
	};
	rootObject = 1D0A00000000000000000050 /* Project object */;
}
"#;

    /// A minimal older project with no `TargetAttributes` map at all.
    pub const LEGACY: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	objectVersion = 46;
	objects = {
		AA0000000000000000000001 = {
			isa = PBXProject;
			attributes = {
				LastUpgradeCheck = 0940;
			};
			targets = ( AA0000000000000000000002 );
		};
		AA0000000000000000000002 = {
			isa = PBXNativeTarget;
			name = Legacy;
			buildConfigurationList = AA0000000000000000000003;
		};
		AA0000000000000000000003 = {
			isa = XCConfigurationList;
			buildConfigurations = ( AA0000000000000000000004 );
		};
		AA0000000000000000000004 = {
			isa = XCBuildConfiguration;
			name = Release;
			buildSettings = { PROVISIONING_PROFILE = "legacy-uuid"; };
		};
	};
	rootObject = AA0000000000000000000001;
}
"#;

    /// Two targets both named `App`; the second one comes first by identifier.
    pub const DUPLICATE_TARGETS: &str = r#"{
	objects = {
		BB0000000000000000000001 = {
			isa = PBXProject;
			attributes = { };
			targets = ( BB0000000000000000000009, BB0000000000000000000002 );
		};
		BB0000000000000000000009 = {
			isa = PBXNativeTarget;
			name = App;
			buildConfigurationList = BB0000000000000000000003;
		};
		BB0000000000000000000002 = {
			isa = PBXNativeTarget;
			name = App;
			buildConfigurationList = BB0000000000000000000003;
		};
		BB0000000000000000000003 = {
			isa = XCConfigurationList;
			buildConfigurations = ( BB0000000000000000000004 );
		};
		BB0000000000000000000004 = {
			isa = XCBuildConfiguration;
			name = Release;
			buildSettings = { };
		};
	};
	rootObject = BB0000000000000000000001;
}
"#;
}

/// Parse a fixture as if it were `App.xcodeproj/project.pbxproj`.
pub fn project(source: &str) -> Project {
    Project::from_bytes(source.as_bytes(), "App.xcodeproj/project.pbxproj").unwrap()
}

/// Fixture for a `.xcodeproj` bundle on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Bundle name without the `.xcodeproj` extension.
    pub name: String,
    /// `project.pbxproj` content.
    pub contents: String,
}

impl ProjectFixture {
    /// The standard two-target project.
    pub fn app() -> Self {
        ProjectFixture {
            name: "App".to_string(),
            contents: projects::APP.to_string(),
        }
    }

    /// Use different document contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Write the bundle into `base_path`, returning the `.xcodeproj` path.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let bundle = base_path.join(format!("{}.xcodeproj", self.name));
        std::fs::create_dir_all(&bundle)?;
        std::fs::write(bundle.join("project.pbxproj"), &self.contents)?;
        Ok(bundle)
    }
}
