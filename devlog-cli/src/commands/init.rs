//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../devlog.yml.example");

/// Initialize a new devlog project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_posts(root)?;

    println!("✓ devlog initialized in {:?}", root);
    println!("  - Edit devlog.yml to customize site metadata");
    println!("  - Write posts in posts/ and run `devlog build`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("devlog.yml");
    if config_path.exists() {
        println!("devlog.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_posts(root: &Path) -> Result<()> {
    let posts = root.join("posts");
    fs::create_dir_all(&posts).with_context(|| format!("Failed to create {:?}", posts))?;

    let sample = posts.join("welcome.md");
    if !sample.exists() {
        let today = chrono::Local::now().date_naive();
        fs::write(&sample, sample_post(&today.format("%Y-%m-%d").to_string()))
            .with_context(|| format!("Failed to write {:?}", sample))?;
        println!("Created {:?}", sample);
    }
    Ok(())
}

fn sample_post(date: &str) -> String {
    format!(
        r#"---
title: "devlog에 오신 것을 환영합니다"
excerpt: "첫 번째 글입니다. front-matter와 코드 하이라이팅을 확인해 보세요."
date: "{date}"
author: "Your Name"
category: "웹 개발"
tags: ["devlog", "시작하기"]
featured: true
---

# 환영합니다

이 파일은 `posts/welcome.md`입니다. 파일 이름이 곧 글의 주소가 됩니다.

```rust
fn main() {{
    println!("Hello, devlog!");
}}
```

`devlog build`로 사이트를 만들고 `out/`을 정적 호스팅에 올리면 됩니다.
"#
    )
}
