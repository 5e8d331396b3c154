//! Java interop for FIR resolution
//!
//! Loads Java classes into a [`FirSession`] and gives them member scopes
//! that follow Java's rules:
//!
//! - [`JavaClassLoader`] registers classes with `Java` origin, mapping
//!   member and supertype types to not-null Kotlin types.
//! - [`JavaClassUseSiteMemberScope`] matches overrides by JVM descriptor.
//! - [`JavaClassMappedScope`] shows a Java class that Kotlin sees as a
//!   Kotlin class (`java/lang/String` as `kotlin/String`) through the Kotlin
//!   class, plus the Java methods a [`SignatureWhitelist`] allows.
//!
//! ```text
//! let loader = fir_java::install(&session, SignatureWhitelist::jvm_builtins());
//! loader.load(&session, &java_class)?;
//! fir_resolve::resolve_files(&session)?;
//! ```

mod descriptor;
mod error;
mod loader;
mod model;
mod provider;
pub mod scopes;
mod type_mapping;
mod whitelist;

use std::sync::Arc;

use fir_resolve::FirSession;

pub use descriptor::{DescriptorWriter, JvmMethodDescriptor};
pub use error::{JavaLoadError, WhitelistError};
pub use loader::{JavaClassIndex, JavaClassInfo, JavaClassLoader, JavaSuperType};
pub use model::{
    JavaClass, JavaClassKind, JavaConstructor, JavaField, JavaMethod, JavaPrimitive, JavaType, JavaTypeArgument,
    JavaTypeParameter, JavaValueParameter,
};
pub use provider::JavaScopeProvider;
pub use scopes::{JavaClassMappedScope, JavaClassUseSiteMemberScope};
pub use type_mapping::{class_id_of, internal_name_of, JavaClassMapping};
pub use whitelist::{SignatureWhitelist, WhitelistEntry};

/// Register the Java scope provider on `session` and return a loader that
/// feeds it.
pub fn install(session: &FirSession, whitelist: SignatureWhitelist) -> JavaClassLoader {
    let mapping = Arc::new(JavaClassMapping::new(session.interner()));
    let index = Arc::new(JavaClassIndex::default());
    session.register_class_scope_provider(Arc::new(JavaScopeProvider::new(
        Arc::clone(&mapping),
        Arc::clone(&index),
        Arc::new(whitelist),
    )));
    tracing::debug!(session = session.id().raw(), "Java interop installed");
    JavaClassLoader::new(mapping, index)
}
