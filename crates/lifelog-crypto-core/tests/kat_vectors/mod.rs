mod aes_cbc;
mod scrypt_kdf;
