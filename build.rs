#[cfg(windows)]
fn main() {
    let mut res = winres::WindowsResource::new();
    res.set("FileDescription", "Singularis Prime language toolkit");
    res.set("ProductName", "Singularis");
    if let Err(e) = res.compile() {
        eprintln!("winres compile warning: {e}");
    }
}

#[cfg(not(windows))]
fn main() {}
