//! The fixed catalog of downloadable engine distributions.
//!
//! The catalog is a closed set defined at process start and passed by
//! reference to whoever needs it; nothing in the harness mutates it at
//! runtime.

use std::collections::BTreeMap;
use std::fmt;

/// Target ABI used to select the binary variant and the strip toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abi {
    /// 32-bit ARM (armeabi-v7a)
    Armv7,
    /// 64-bit ARM (arm64-v8a)
    Arm64,
    /// 32-bit x86
    X86,
    /// 64-bit x86
    X86_64,
}

impl Abi {
    /// The `jni/<abi>` directory name inside a packaged archive
    pub fn dir_name(&self) -> &'static str {
        match self {
            Abi::Armv7 => "armeabi-v7a",
            Abi::Arm64 => "arm64-v8a",
            Abi::X86 => "x86",
            Abi::X86_64 => "x86_64",
        }
    }

    /// Toolchain directory pattern for locating this ABI's strip tool
    pub fn toolchain_pattern(&self) -> &'static str {
        match self {
            Abi::Armv7 => "arm-linux-androideabi-*",
            Abi::Arm64 => "aarch64-linux-android-*",
            Abi::X86 => "x86-*",
            Abi::X86_64 => "x86_64-*",
        }
    }

    /// Parse an ABI from its directory name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "armeabi-v7a" => Some(Abi::Armv7),
            "arm64-v8a" => Some(Abi::Arm64),
            "x86" => Some(Abi::X86),
            "x86_64" => Some(Abi::X86_64),
            _ => None,
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One downloadable, versioned engine distribution.
#[derive(Debug, Clone)]
pub struct DistributionSpec {
    /// Stable cache key
    pub identity: String,
    /// Remote tgz location
    pub fetch_url: String,
    /// Declared version string, for reporting
    pub version: String,
    /// Free-form capability tags, for reporting
    pub meta: Vec<String>,
    /// Glob locating the packaged archive member under the cache entry
    pub archive_member_glob: String,
    /// Name of the shared library to extract from the archive member
    pub binary_name: String,
}

impl DistributionSpec {
    fn new(
        identity: &str,
        fetch_url: &str,
        version: &str,
        meta: &[&str],
        archive_member_glob: &str,
        binary_name: &str,
    ) -> Self {
        Self {
            identity: identity.to_string(),
            fetch_url: fetch_url.to_string(),
            version: version.to_string(),
            meta: meta.iter().map(|m| m.to_string()).collect(),
            archive_member_glob: archive_member_glob.to_string(),
            binary_name: binary_name.to_string(),
        }
    }
}

/// The distribution catalog, keyed by identity.
#[derive(Debug, Clone)]
pub struct DistCatalog {
    specs: BTreeMap<String, DistributionSpec>,
}

impl DistCatalog {
    /// The built-in catalog of engine distributions the harness compares
    pub fn builtin() -> Self {
        let mut specs = BTreeMap::new();
        for spec in [
            DistributionSpec::new(
                "jsc_official_245459",
                "https://registry.npmjs.org/jsc-android/-/jsc-android-245459.0.0.tgz",
                "245459.0.0",
                &["Baseline JIT (but not x86)", "WebKitGTK 2.24.2", "Support Intl"],
                "**/android-jsc-intl/**/*.aar",
                "libjsc.so",
            ),
            DistributionSpec::new(
                "jsc_245459_no_jit",
                "https://registry.npmjs.org/@kudo-ci/jsc-android/-/jsc-android-245459.0.0-no-jit.tgz",
                "245459.0.0-no-jit",
                &["JIT-less", "WebKitGTK 2.24.2", "Support Intl"],
                "**/android-jsc-intl/**/*.aar",
                "libjsc.so",
            ),
            DistributionSpec::new(
                "v8_751",
                "https://registry.npmjs.org/v8-android/-/v8-android-7.5.1.tgz",
                "7.5.1",
                &["JIT-less (but not arm64-v8a)", "V8 7.5.288.23", "Support Intl"],
                "**/*.aar",
                "libv8.so",
            ),
            DistributionSpec::new(
                "v8_751_jit",
                "https://registry.npmjs.org/v8-android/-/v8-android-7.5.1-jit.tgz",
                "7.5.1",
                &["JIT", "V8 7.5.288.23", "Support Intl"],
                "**/*.aar",
                "libv8.so",
            ),
        ] {
            specs.insert(spec.identity.clone(), spec);
        }
        Self { specs }
    }

    /// Look up a spec by identity
    pub fn get(&self, identity: &str) -> Option<&DistributionSpec> {
        self.specs.get(identity)
    }

    /// Iterate over all specs in identity order
    pub fn iter(&self) -> impl Iterator<Item = &DistributionSpec> {
        self.specs.values()
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
