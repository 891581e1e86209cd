mod facility;
