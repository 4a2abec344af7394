#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Appointment sheet with every registry column plus a repeated `DATA` header.
pub const SAMPLE_SHEET: &str = "\
DATA,ORDEM DE SERVIÇO,Fabricante,Produto,Defeito Relatado,Nome Completo,Whatsapp/Celular,Endereço,Número,Bairro/Cidade,CEP,Complemento,DATA
06/05/2024,OS-101,Brastemp,Geladeira,Não gela,Ana Souza,11 99999-0001,Rua das Flores,10,Centro/São Paulo,01000-000,Apto 3,ignored
06/05/2024,OS-102,Samsung,TV,Tela quebrada,Bruno Lima,11 99999-0002,Av. Paulista,1500,Bela Vista/São Paulo,01310-100,,x
07/05/2024,OS-103,LG,Notebook,Teclado falhando,Carla Dias,11 99999-0003,Rua Augusta,200,Consolação/São Paulo,01305-000,Casa,
sem data,OS-104,Electrolux,Fogão,Boca não acende,Davi Rocha,11 99999-0004,Rua Direita,5,Sé/São Paulo,01002-000,,
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn sample_sheet(&self) -> PathBuf {
        self.write("agendamentos.csv", SAMPLE_SHEET)
    }
}

/// Sheet with `count` appointments on consecutive days of May 2024.
pub fn numbered_sheet(count: usize) -> String {
    let mut sheet = String::from("DATA,ORDEM DE SERVIÇO,Nome Completo\n");
    for i in 0..count {
        sheet.push_str(&format!("{:02}/05/2024,OS-{i},Cliente {i}\n", i % 28 + 1));
    }
    sheet
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
