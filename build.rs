fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/eventhub.proto");

    // protox compiles the schema in-process, so no system protoc is needed
    let descriptors = protox::compile(["eventhub.proto"], ["proto"])?;

    tonic_build::configure()
        .type_attribute(
            ".eventhub.Event",
            "#[derive(serde::Serialize, serde::Deserialize)]",
        )
        .compile_fds(descriptors)?;

    Ok(())
}
