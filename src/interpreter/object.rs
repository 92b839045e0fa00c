/// Instances.
///
/// Defines `DynamicObject`: instance variables, the class link and the lazily
/// created singleton class.
pub mod dynamic_object;
/// Classes, modules and singleton classes.
///
/// Defines `DynamicClass`, its method table and constants, and the method
/// resolution walk up the superclass chain.
pub mod dynamic_class;
