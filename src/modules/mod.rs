pub mod catalog;
pub mod covers;

use bibliotech_kernel::settings::Settings;
use bibliotech_kernel::ModuleRegistry;

/// Register every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register_core(covers::create_module(settings.storage.public_path.clone()));
    registry.register_custom(catalog::create_module());
}
