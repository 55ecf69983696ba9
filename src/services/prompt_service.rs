use crate::models::case_record::CaseMode;

const GENERATE_TEMPLATE: &str = r#"IKUTI INSTRUKSI INI DENGAN KETAT.

TUJUAN
- Hasilkan SATU kasus detektif singkat (ID) lengkap 3 tersangka.

ATURAN WAJIB
- Keluarkan HANYA JSON valid (tanpa teks lain/markdown/```/komentar).
- Semua string pakai tanda kutip ganda ".
- Field "jawaban" HARUS persis SATU huruf kapital dan cocok regex: ^[ABC]$  (BUKAN "A|B" atau "A, C").
- Buat ringkas dan konsisten waktu & tempat.
- Semua output dibuat dengan bahasa Indonesia
{custom_request}
FORMAT OUTPUT (WAJIB)
{
  "judul": "Judul kasus singkat (maks 60 karakter)",
  "lokasi": "Kota, Negara",
  "laporan": "2-4 kalimat: siapa korban, waktu/kejadian, dan 1-2 petunjuk kunci.",
  "tersangka": [
    {"id":"A","nama":"Nama lengkap","deskripsi":"1 kalimat alibi + detail lokasional/waktu"},
    {"id":"B","nama":"Nama lengkap","deskripsi":"1 kalimat alibi + detail lokasional/waktu"},
    {"id":"C","nama":"Nama lengkap","deskripsi":"1 kalimat alibi + detail lokasional/waktu"}
  ],
  "jawaban": "A|B|C",
  "penjelasan": "2-4 kalimat: kaitkan petunjuk kunci ke pelaku dan bantah alibi lainnya."
}

CONTOH YANG SALAH
{ "jawaban": "A|B", "penjelasan": "..." }  <-- TIDAK BOLEH. BUKAN SATU HURUF.

CONTOH YANG BENAR
{ "jawaban": "C", "penjelasan": "..." }

HASILKAN HANYA JSON SESUAI FORMAT."#;

const ANALYZE_TEMPLATE: &str = r#"IKUTI INSTRUKSI INI DENGAN KETAT.

TUJUAN
- Analisis kasus berikut untuk menentukan SATU pelaku paling mungkin.

ATURAN WAJIB
- Keluarkan HANYA JSON valid (tanpa teks lain/markdown).
- "jawaban" HARUS persis SATU huruf kapital dan cocok regex: ^[ABC]$.
- "penjelasan" 2–4 kalimat, faktual, merujuk petunjuk & alibi.
- Semua output dibuat dengan bahasa Indonesia

FORMAT OUTPUT (WAJIB)
{
  "jawaban": "A|B|C",
  "penjelasan": "alasan singkat 2–4 kalimat"
}

CONTOH YANG SALAH
{ "jawaban": "A|B", "penjelasan": "..." }

CONTOH YANG BENAR
{ "jawaban": "B", "penjelasan": "..." }

KASUS
{case_text}

HASILKAN HANYA JSON SESUAI FORMAT."#;

const RETRY_NOTE: &str = r#"

CATATAN PERBAIKAN
- Jawaban sebelumnya TIDAK VALID dan ditolak.
- Field "jawaban" HARUS persis SATU huruf kapital dan cocok regex: ^[ABC]$  (BUKAN "A|B", "A, C", atau daftar).
- Ulangi dengan HANYA JSON valid sesuai FORMAT OUTPUT di atas."#;

pub fn build_prompt(mode: &CaseMode) -> String {
    match mode {
        CaseMode::Generate { custom_request } => {
            let section = match custom_request.as_deref().map(str::trim) {
                Some(extra) if !extra.is_empty() => {
                    format!("\nPERMINTAAN TAMBAHAN\n- {}\n", extra)
                }
                _ => String::new(),
            };
            GENERATE_TEMPLATE.replacen("{custom_request}", &section, 1)
        }
        CaseMode::Analyze { case_text } => {
            ANALYZE_TEMPLATE.replacen("{case_text}", case_text, 1)
        }
    }
}

/// Prompt for the single retry: the original instructions followed by a corrective note.
pub fn with_retry_note(prompt: &str) -> String {
    format!("{}{}", prompt, RETRY_NOTE)
}
