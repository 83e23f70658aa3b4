//! Request-local type-resolution scope.

use tracing::debug;

use crate::domain::DeploymentTopology;
use crate::error::Result;
use crate::port::outbound::context::TypeContext;

/// Guard keeping a topology's type context open.
///
/// The context is exited when the guard drops, on every exit path including
/// early returns and unwinding.
pub struct TypeScope<'a> {
    context: &'a dyn TypeContext,
    archive_name: String,
    archive_version: String,
}

impl<'a> TypeScope<'a> {
    /// Enter the type context declared by `topology`.
    pub fn enter(context: &'a dyn TypeContext, topology: &DeploymentTopology) -> Result<Self> {
        context.enter(&topology.archive_name, &topology.archive_version)?;
        debug!(
            archive = %topology.archive_name,
            version = %topology.archive_version,
            "Entered type context"
        );
        Ok(Self {
            context,
            archive_name: topology.archive_name.clone(),
            archive_version: topology.archive_version.clone(),
        })
    }
}

impl Drop for TypeScope<'_> {
    fn drop(&mut self) {
        self.context.exit(&self.archive_name, &self.archive_version);
        debug!(
            archive = %self.archive_name,
            version = %self.archive_version,
            "Exited type context"
        );
    }
}
