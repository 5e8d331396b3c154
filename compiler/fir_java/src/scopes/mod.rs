//! Member scopes of Java classes.
//!
//! Java overrides are matched by JVM descriptor rather than by Kotlin
//! parameter types: two methods override each other when their names and
//! erased parameter descriptors agree.

mod mapped;
mod use_site;

pub use mapped::JavaClassMappedScope;
pub use use_site::JavaClassUseSiteMemberScope;

use fir_resolve::FirSession;
use fir_tree::FunctionSymbol;

use crate::descriptor::{DescriptorWriter, JvmMethodDescriptor};
use crate::type_mapping::JavaClassMapping;

fn descriptor_of(session: &FirSession, mapping: &JavaClassMapping, symbol: FunctionSymbol) -> Option<JvmMethodDescriptor> {
    DescriptorWriter::new(session, mapping).method(symbol)
}

#[cfg(test)]
mod tests;
