fn main() {
    // Only the firmware build needs the ESP-IDF environment; host test builds
    // run without the `espidf` feature and skip this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
